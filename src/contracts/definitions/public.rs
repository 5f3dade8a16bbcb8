//! Public website endpoints: content listings, forms, chatbot, meta.

use serde_json::json;

use super::{
    brand, case_study, category, list_query, message, paginated, pagination_query, post,
    service, single, slug_param, testimonial,
};
use crate::contracts::contract::EndpointContract;
use crate::contracts::registry::ApiRegistry;
use crate::contracts::schema::{Property, Schema};
use crate::error_codes::ErrorCode;

const PUBLIC_RATE: &str = "60/minute";
const FORM_RATE: &str = "5/minute";

pub fn register(registry: &mut ApiRegistry) {
    register_posts(registry);
    register_portfolio(registry);
    register_forms(registry);
    register_chatbot(registry);
    register_meta(registry);
}

fn register_posts(registry: &mut ApiRegistry) {
    registry.register(
        EndpointContract::get("/api/posts", "List blog posts")
            .description("Published posts, newest first")
            .group("posts")
            .tags(["Blog"])
            .public()
            .query_params(
                list_query()
                    .property("category", "string", false)
                    .property("tag", "string", false),
            )
            .response(paginated(post()))
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/posts/featured", "Featured blog posts")
            .group("posts")
            .tags(["Blog"])
            .public()
            .query_params(Schema::object().property_with(
                "limit",
                Property::new("integer").example(3),
            ))
            .response(single(Schema::array_of(post())))
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/posts/{slug}", "Show blog post")
            .group("posts")
            .tags(["Blog"])
            .public()
            .path_params(slug_param())
            .response(single(post()))
            .errors([ErrorCode::ResourceNotFound])
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/posts/{slug}/related", "Related blog posts")
            .group("posts")
            .tags(["Blog"])
            .public()
            .path_params(slug_param())
            .response(single(Schema::array_of(post())))
            .errors([ErrorCode::ResourceNotFound])
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/categories", "List post categories")
            .group("posts")
            .tags(["Blog"])
            .public()
            .response(single(Schema::array_of(category())))
            .rate_limit(PUBLIC_RATE),
    );

    // Pre-v2 clients read posts from the blog prefix
    registry.register(
        EndpointContract::get("/api/blog/posts", "List blog posts (legacy)")
            .group("posts")
            .tags(["Blog"])
            .public()
            .versions(["v1", "v2"])
            .deprecated(
                "v2",
                Some("The blog prefix is retired"),
                Some("/api/posts"),
            )
            .removed_in("v3")
            .query_params(pagination_query())
            .response(paginated(post()))
            .rate_limit(PUBLIC_RATE),
    );
}

fn register_portfolio(registry: &mut ApiRegistry) {
    registry.register(
        EndpointContract::get("/api/services", "List services")
            .group("services")
            .tags(["Services"])
            .public()
            .response(single(Schema::array_of(service())))
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/services/{slug}", "Show service")
            .group("services")
            .tags(["Services"])
            .public()
            .path_params(slug_param())
            .response(single(service()))
            .errors([ErrorCode::ResourceNotFound])
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/case-studies", "List case studies")
            .group("case-studies")
            .tags(["Portfolio"])
            .public()
            .query_params(
                pagination_query()
                    .property("industry", "string", false)
                    .property("service", "string", false),
            )
            .response(paginated(case_study()))
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/case-studies/{slug}", "Show case study")
            .group("case-studies")
            .tags(["Portfolio"])
            .public()
            .path_params(slug_param())
            .response(single(case_study()))
            .errors([ErrorCode::ResourceNotFound])
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/testimonials", "List testimonials")
            .group("testimonials")
            .tags(["Portfolio"])
            .public()
            .query_params(Schema::object().property("featured", "boolean", false))
            .response(single(Schema::array_of(testimonial())))
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/brands", "List client brands")
            .description("Logos shown in the client strip")
            .group("brands")
            .tags(["Portfolio"])
            .public()
            .response(single(Schema::array_of(brand())))
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::get("/api/settings/public", "Public site settings")
            .description("Site name, contact details and social links")
            .group("settings")
            .tags(["Settings"])
            .public()
            .response(single(
                Schema::object()
                    .property("site_name", "string", true)
                    .property("contact_email", "email", false)
                    .property("phone", "string", false)
                    .property("address", "string", false)
                    .property("social_links", "object", false),
            ))
            .rate_limit(PUBLIC_RATE),
    );
}

fn register_forms(registry: &mut ApiRegistry) {
    registry.register(
        EndpointContract::post("/api/contact", "Submit contact form")
            .description("Stores an inquiry and notifies the agency inbox")
            .group("contact")
            .tags(["Forms"])
            .public()
            .request_body(
                Schema::object()
                    .property_with(
                        "name",
                        Property::new("string").required().example("Ada Lovelace"),
                    )
                    .property_with(
                        "email",
                        Property::new("email").required().example("ada@example.com"),
                    )
                    .property("phone", "string", false)
                    .property("company", "string", false)
                    .property("service", "string", false)
                    .property("budget", "string", false)
                    .property_with(
                        "message",
                        Property::new("string")
                            .required()
                            .example("We need a new website."),
                    ),
            )
            .response(message())
            .errors([
                ErrorCode::ValidationError,
                ErrorCode::RateLimited,
                ErrorCode::EmailDeliveryFailed,
            ])
            .rate_limit(FORM_RATE)
            .example(
                "minimal inquiry",
                Some(json!({
                    "name": "Ada Lovelace",
                    "email": "ada@example.com",
                    "message": "We need a new website."
                })),
                Some(json!({ "success": true, "message": "Thank you, we will be in touch." })),
            ),
    );

    registry.register(
        EndpointContract::post("/api/newsletter/subscribe", "Subscribe to newsletter")
            .group("newsletter")
            .tags(["Forms"])
            .public()
            .request_body(
                Schema::object()
                    .property_with(
                        "email",
                        Property::new("email").required().example("ada@example.com"),
                    )
                    .property("name", "string", false),
            )
            .response(message())
            .errors([
                ErrorCode::ValidationError,
                ErrorCode::DuplicateEntry,
                ErrorCode::RateLimited,
            ])
            .rate_limit(FORM_RATE),
    );

    registry.register(
        EndpointContract::post("/api/newsletter/unsubscribe", "Unsubscribe from newsletter")
            .group("newsletter")
            .tags(["Forms"])
            .public()
            .request_body(
                Schema::object()
                    .property("email", "email", true)
                    .property("token", "string", true),
            )
            .response(message())
            .errors([ErrorCode::ValidationError, ErrorCode::ResourceNotFound])
            .rate_limit(FORM_RATE),
    );
}

fn register_chatbot(registry: &mut ApiRegistry) {
    registry.register(
        EndpointContract::get("/api/chatbot/config", "Chatbot widget configuration")
            .description("Greeting, quick replies and widget appearance")
            .group("chatbot")
            .tags(["Chatbot"])
            .public()
            .response(single(
                Schema::object()
                    .property("enabled", "boolean", true)
                    .property("greeting", "string", true)
                    .property("quick_replies", Schema::array_of("string"), false)
                    .property("theme_color", "string", false)
                    .property("fallback_message", "string", false),
            ))
            .rate_limit(PUBLIC_RATE),
    );

    registry.register(
        EndpointContract::post("/api/chatbot/message", "Send chatbot message")
            .description("Matches the message against configured keyword rules")
            .group("chatbot")
            .tags(["Chatbot"])
            .public()
            .request_body(
                Schema::object()
                    .property_with(
                        "message",
                        Property::new("string").required().example("What are your prices?"),
                    )
                    .property("session_id", "uuid", false),
            )
            .response(single(
                Schema::object()
                    .property("reply", "string", true)
                    .property("matched_rule", "uuid", false)
                    .property("quick_replies", Schema::array_of("string"), false),
            ))
            .errors([ErrorCode::ValidationError, ErrorCode::RateLimited])
            .rate_limit("30/minute"),
    );
}

fn register_meta(registry: &mut ApiRegistry) {
    let version_query = Schema::object().property_with(
        "version",
        Property::new("string")
            .example("v1")
            .description("Requested API version"),
    );

    registry.register(
        EndpointContract::get("/api/health", "Health check")
            .group("meta")
            .tags(["Meta"])
            .public()
            .response(
                Schema::object()
                    .property("status", "string", true)
                    .property("version", "string", true),
            ),
    );

    registry.register(
        EndpointContract::get("/api/meta", "API discovery document")
            .description("Versioning, response formats, error codes and grouped endpoints")
            .group("meta")
            .tags(["Meta"])
            .public()
            .query_params(version_query.clone())
            .headers([("X-API-Version", "Requested API version")]),
    );

    registry.register(
        EndpointContract::get("/api/meta/endpoints", "Grouped endpoint catalog")
            .group("meta")
            .tags(["Meta"])
            .public()
            .query_params(version_query.clone()),
    );

    registry.register(
        EndpointContract::get("/api/meta/versions", "Supported API versions")
            .group("meta")
            .tags(["Meta"])
            .public()
            .response(single(
                Schema::object()
                    .property("current", "string", true)
                    .property("default", "string", true)
                    .property("latest", "string", true)
                    .property("supported", Schema::array_of("string"), true),
            )),
    );

    registry.register(
        EndpointContract::get("/api/meta/errors", "Error code catalog")
            .group("meta")
            .tags(["Meta"])
            .public(),
    );

    registry.register(
        EndpointContract::get("/api/meta/schemas", "Common schemas")
            .group("meta")
            .tags(["Meta"])
            .public(),
    );

    registry.register(
        EndpointContract::get("/api/meta/auth", "Authentication guide")
            .group("meta")
            .tags(["Meta"])
            .public(),
    );

    registry.register(
        EndpointContract::get("/api/meta/openapi", "OpenAPI document")
            .description("OpenAPI 3.0.3 rendering of the endpoint catalog")
            .group("meta")
            .tags(["Meta"])
            .public()
            .query_params(version_query.property_with(
                "format",
                Property::new("string").example("json").description("json or yaml"),
            )),
    );

    let validation_target = || {
        Schema::object()
            .property_with("method", Property::new("string").required().example("POST"))
            .property_with(
                "path",
                Property::new("string")
                    .required()
                    .example("api/admin/contacts/42/status")
                    .description("Remaining request path, may span several segments"),
            )
    };

    registry.register(
        EndpointContract::get("/api/meta/validation/{method}/{path}", "Derived validation rules")
            .group("meta")
            .tags(["Meta"])
            .public()
            .path_params(validation_target())
            .response(single(
                Schema::object()
                    .property("method", "string", true)
                    .property("path", "string", true)
                    .property("rules", "object", true),
            ))
            .errors([ErrorCode::ResourceNotFound]),
    );

    registry.register(
        EndpointContract::post("/api/meta/validation/{method}/{path}", "Validate a request body")
            .description("Check a JSON body against the derived validation rules of a contract")
            .group("meta")
            .tags(["Meta"])
            .public()
            .path_params(validation_target())
            .request_body(Schema::object().describe("Body to check, shaped like the target request"))
            .response(single(Schema::object().property("valid", "boolean", true)))
            .errors([
                ErrorCode::ValidationError,
                ErrorCode::InvalidRequest,
                ErrorCode::ResourceNotFound,
            ]),
    );
}
