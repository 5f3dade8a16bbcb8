//! Token authentication for site users (`sanctum` guard) and the admin
//! panel (`admin` guard).

use serde_json::json;

use super::{message, single, token, user};
use crate::contracts::contract::EndpointContract;
use crate::contracts::registry::ApiRegistry;
use crate::contracts::schema::{Property, Schema};
use crate::error_codes::ErrorCode;

const AUTH_RATE: &str = "10/minute";

fn credentials() -> Schema {
    Schema::object()
        .property_with(
            "email",
            Property::new("email").required().example("ada@example.com"),
        )
        .property_with(
            "password",
            Property::new("string").required().example("correct-horse-battery"),
        )
        .property("device_name", "string", false)
}

fn admin_user() -> Schema {
    user()
        .property_with(
            "role",
            Property::new("string")
                .required()
                .example("editor")
                .description("super_admin, admin or editor"),
        )
        .property("permissions", Schema::array_of("string"), false)
        .property("last_login_at", "datetime", false)
}

pub fn register(registry: &mut ApiRegistry) {
    registry.register(
        EndpointContract::post("/api/auth/register", "Register account")
            .group("auth")
            .tags(["Authentication"])
            .public()
            .request_body(
                Schema::object()
                    .property("name", "string", true)
                    .property("email", "email", true)
                    .property("password", "string", true)
                    .property("password_confirmation", "string", true),
            )
            .response(single(
                Schema::object()
                    .property("user", user(), true)
                    .property("token", token(), true),
            ))
            .errors([ErrorCode::ValidationError, ErrorCode::DuplicateEntry])
            .rate_limit(AUTH_RATE),
    );

    registry.register(
        EndpointContract::post("/api/auth/login", "Log in")
            .description("Exchange credentials for a bearer token")
            .group("auth")
            .tags(["Authentication"])
            .public()
            .request_body(credentials())
            .response(single(
                Schema::object()
                    .property("user", user(), true)
                    .property("token", token(), true),
            ))
            .errors([
                ErrorCode::ValidationError,
                ErrorCode::InvalidCredentials,
                ErrorCode::RateLimited,
            ])
            .rate_limit(AUTH_RATE)
            .example(
                "successful login",
                Some(json!({ "email": "ada@example.com", "password": "correct-horse-battery" })),
                Some(json!({
                    "success": true,
                    "data": {
                        "user": { "id": "9b2f7c1e-3d4a-4f6b-8e21-5a7c9d0e1f23", "name": "Ada", "email": "ada@example.com" },
                        "token": { "token": "1|q8Hc2Yl0Y5n1...", "token_type": "Bearer" }
                    }
                })),
            ),
    );

    registry.register(
        EndpointContract::post("/api/auth/logout", "Log out")
            .description("Revoke the current token")
            .group("auth")
            .tags(["Authentication"])
            .auth("sanctum")
            .response(message())
            .errors([ErrorCode::Unauthenticated]),
    );

    registry.register(
        EndpointContract::get("/api/auth/me", "Current user")
            .group("auth")
            .tags(["Authentication"])
            .auth("sanctum")
            .response(single(user()))
            .errors([ErrorCode::Unauthenticated, ErrorCode::TokenExpired]),
    );

    registry.register(
        EndpointContract::post("/api/auth/refresh", "Refresh token")
            .description("Issue a new token and revoke the presented one")
            .group("auth")
            .tags(["Authentication"])
            .auth("sanctum")
            .introduced_in("v2")
            .response(single(token()))
            .errors([ErrorCode::Unauthenticated, ErrorCode::TokenExpired]),
    );

    registry.register(
        EndpointContract::post("/api/auth/forgot-password", "Request password reset")
            .group("auth")
            .tags(["Authentication"])
            .public()
            .request_body(Schema::object().property("email", "email", true))
            .response(message())
            .errors([
                ErrorCode::ValidationError,
                ErrorCode::RateLimited,
                ErrorCode::EmailDeliveryFailed,
            ])
            .rate_limit("3/minute"),
    );

    registry.register(
        EndpointContract::post("/api/auth/reset-password", "Reset password")
            .group("auth")
            .tags(["Authentication"])
            .public()
            .request_body(
                Schema::object()
                    .property("token", "string", true)
                    .property("email", "email", true)
                    .property("password", "string", true)
                    .property("password_confirmation", "string", true),
            )
            .response(message())
            .errors([ErrorCode::ValidationError, ErrorCode::TokenExpired])
            .rate_limit(AUTH_RATE),
    );

    register_admin_auth(registry);
}

fn register_admin_auth(registry: &mut ApiRegistry) {
    registry.register(
        EndpointContract::post("/api/admin/auth/login", "Admin log in")
            .group("admin-auth")
            .tags(["Admin Authentication"])
            .public()
            .request_body(credentials())
            .response(single(
                Schema::object()
                    .property("user", admin_user(), true)
                    .property("token", token(), true),
            ))
            .errors([
                ErrorCode::ValidationError,
                ErrorCode::InvalidCredentials,
                ErrorCode::Forbidden,
                ErrorCode::RateLimited,
            ])
            .rate_limit("5/minute"),
    );

    registry.register(
        EndpointContract::post("/api/admin/auth/logout", "Admin log out")
            .group("admin-auth")
            .tags(["Admin Authentication"])
            .admin_auth()
            .response(message())
            .errors([ErrorCode::Unauthenticated]),
    );

    registry.register(
        EndpointContract::get("/api/admin/auth/me", "Current admin")
            .group("admin-auth")
            .tags(["Admin Authentication"])
            .admin_auth()
            .response(single(admin_user()))
            .errors([ErrorCode::Unauthenticated, ErrorCode::TokenExpired]),
    );

    registry.register(
        EndpointContract::put("/api/admin/auth/password", "Change admin password")
            .group("admin-auth")
            .tags(["Admin Authentication"])
            .admin_auth()
            .request_body(
                Schema::object()
                    .property("current_password", "string", true)
                    .property("password", "string", true)
                    .property("password_confirmation", "string", true),
            )
            .response(message())
            .errors([
                ErrorCode::ValidationError,
                ErrorCode::Unauthenticated,
                ErrorCode::InvalidCredentials,
            ]),
    );
}
