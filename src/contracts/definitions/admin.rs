//! Admin panel endpoints. Everything here requires the `admin` guard; roles
//! narrow access further.

use super::{
    brand, case_study, category, id_param, list_query, message, paginated, post, service, single,
    testimonial, user,
};
use crate::contracts::contract::EndpointContract;
use crate::contracts::registry::ApiRegistry;
use crate::contracts::schema::{Property, Schema};
use crate::error_codes::ErrorCode;

const ADMIN_RATE: &str = "120/minute";

/// A resource managed through the standard five CRUD routes
struct Resource {
    /// Path segment under `/api/admin`
    segment: &'static str,
    /// Singular label used in endpoint names
    label: &'static str,
    group: &'static str,
    tag: &'static str,
    role: &'static str,
    item: fn() -> Schema,
    /// Create/update body
    input: fn() -> Schema,
}

impl Resource {
    fn collection(&self) -> String {
        format!("/api/admin/{}", self.segment)
    }

    fn member(&self) -> String {
        format!("/api/admin/{}/{{id}}", self.segment)
    }

    fn base(&self, contract: EndpointContract) -> EndpointContract {
        contract
            .group(self.group)
            .tags([self.tag])
            .admin_auth()
            .role(self.role)
            .rate_limit(ADMIN_RATE)
    }

    fn register(&self, registry: &mut ApiRegistry) {
        let collection = self.collection();
        let member = self.member();

        registry.register(
            self.base(EndpointContract::get(&collection, &format!("List {}s", self.label)))
                .query_params(list_query())
                .response(paginated((self.item)()))
                .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
        );

        registry.register(
            self.base(EndpointContract::post(&collection, &format!("Create {}", self.label)))
                .request_body((self.input)())
                .response(single((self.item)()))
                .errors([
                    ErrorCode::ValidationError,
                    ErrorCode::Unauthenticated,
                    ErrorCode::InsufficientRole,
                    ErrorCode::DuplicateEntry,
                ]),
        );

        registry.register(
            self.base(EndpointContract::get(&member, &format!("Show {}", self.label)))
                .path_params(id_param())
                .response(single((self.item)()))
                .errors([
                    ErrorCode::Unauthenticated,
                    ErrorCode::InsufficientRole,
                    ErrorCode::ResourceNotFound,
                ]),
        );

        registry.register(
            self.base(EndpointContract::put(&member, &format!("Update {}", self.label)))
                .path_params(id_param())
                .request_body((self.input)())
                .response(single((self.item)()))
                .errors([
                    ErrorCode::ValidationError,
                    ErrorCode::Unauthenticated,
                    ErrorCode::InsufficientRole,
                    ErrorCode::ResourceNotFound,
                ]),
        );

        registry.register(
            self.base(EndpointContract::delete(&member, &format!("Delete {}", self.label)))
                .path_params(id_param())
                .response(message())
                .errors([
                    ErrorCode::Unauthenticated,
                    ErrorCode::InsufficientRole,
                    ErrorCode::ResourceNotFound,
                ]),
        );
    }
}

fn post_input() -> Schema {
    Schema::object()
        .property("title", "string", true)
        .property("slug", "string", false)
        .property("excerpt", "string", false)
        .property("content", "string", true)
        .property("category_id", "uuid", false)
        .property("tags", Schema::array_of("string"), false)
        .property("cover_image", "url", false)
        .property_with(
            "status",
            Property::new("string")
                .required()
                .example("draft")
                .description("draft, scheduled or published"),
        )
        .property("published_at", "datetime", false)
        .property("is_featured", "boolean", false)
        .property("seo", super::seo(), false)
}

fn category_input() -> Schema {
    Schema::object()
        .property("name", "string", true)
        .property("slug", "string", false)
        .property("description", "string", false)
}

fn service_input() -> Schema {
    Schema::object()
        .property("title", "string", true)
        .property("slug", "string", false)
        .property("summary", "string", false)
        .property("description", "string", true)
        .property("icon", "string", false)
        .property("features", Schema::array_of("string"), false)
        .property("starting_price", "number", false)
        .property("sort_order", "integer", false)
        .property("is_active", "boolean", false)
}

fn case_study_input() -> Schema {
    Schema::object()
        .property("title", "string", true)
        .property("client", "string", true)
        .property("industry", "string", false)
        .property("challenge", "string", false)
        .property("solution", "string", false)
        .property("results", Schema::array_of("string"), false)
        .property("cover_image", "url", false)
        .property("gallery", Schema::array_of("url"), false)
        .property("service_ids", Schema::array_of("uuid"), false)
        .property("completed_at", "date", false)
        .property("is_published", "boolean", false)
}

fn testimonial_input() -> Schema {
    Schema::object()
        .property("author_name", "string", true)
        .property("author_title", "string", false)
        .property("company", "string", false)
        .property("quote", "string", true)
        .property("rating", "integer", false)
        .property("avatar", "url", false)
        .property("is_featured", "boolean", false)
}

fn brand_input() -> Schema {
    Schema::object()
        .property("name", "string", true)
        .property("logo", "file", true)
        .property("website", "url", false)
        .property("sort_order", "integer", false)
}

fn admin_user_item() -> Schema {
    user()
        .property("role", "string", true)
        .property("is_active", "boolean", false)
        .property("last_login_at", "datetime", false)
}

fn admin_user_input() -> Schema {
    Schema::object()
        .property("name", "string", true)
        .property("email", "email", true)
        .property("password", "string", false)
        .property_with(
            "role",
            Property::new("string")
                .required()
                .example("editor")
                .description("super_admin, admin or editor"),
        )
        .property("is_active", "boolean", false)
}

fn chatbot_rule() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property("keywords", Schema::array_of("string"), true)
        .property("response", "string", true)
        .property("priority", "integer", false)
        .property("is_active", "boolean", false)
}

fn chatbot_rule_input() -> Schema {
    Schema::object()
        .property("keywords", Schema::array_of("string"), true)
        .property("response", "string", true)
        .property("priority", "integer", false)
        .property("is_active", "boolean", false)
}

const RESOURCES: &[Resource] = &[
    Resource {
        segment: "posts",
        label: "post",
        group: "admin-posts",
        tag: "Admin Blog",
        role: "editor",
        item: post,
        input: post_input,
    },
    Resource {
        segment: "categories",
        label: "category",
        group: "admin-posts",
        tag: "Admin Blog",
        role: "editor",
        item: category,
        input: category_input,
    },
    Resource {
        segment: "services",
        label: "service",
        group: "admin-services",
        tag: "Admin Services",
        role: "admin",
        item: service,
        input: service_input,
    },
    Resource {
        segment: "case-studies",
        label: "case study",
        group: "admin-case-studies",
        tag: "Admin Portfolio",
        role: "editor",
        item: case_study,
        input: case_study_input,
    },
    Resource {
        segment: "testimonials",
        label: "testimonial",
        group: "admin-testimonials",
        tag: "Admin Portfolio",
        role: "editor",
        item: testimonial,
        input: testimonial_input,
    },
    Resource {
        segment: "brands",
        label: "brand",
        group: "admin-brands",
        tag: "Admin Portfolio",
        role: "admin",
        item: brand,
        input: brand_input,
    },
    Resource {
        segment: "chatbot/rules",
        label: "chatbot rule",
        group: "admin-chatbot",
        tag: "Admin Chatbot",
        role: "admin",
        item: chatbot_rule,
        input: chatbot_rule_input,
    },
    Resource {
        segment: "users",
        label: "user",
        group: "admin-users",
        tag: "Admin Users",
        role: "super_admin",
        item: admin_user_item,
        input: admin_user_input,
    },
];

pub fn register(registry: &mut ApiRegistry) {
    for resource in RESOURCES {
        resource.register(registry);
    }

    register_dashboard(registry);
    register_inbox(registry);
    register_chatbot_settings(registry);
    register_settings(registry);
    register_media(registry);
}

fn admin(contract: EndpointContract, group: &str, tag: &str, role: &str) -> EndpointContract {
    contract
        .group(group)
        .tags([tag])
        .admin_auth()
        .role(role)
        .rate_limit(ADMIN_RATE)
}

fn register_dashboard(registry: &mut ApiRegistry) {
    registry.register(
        admin(
            EndpointContract::get("/api/admin/dashboard/stats", "Dashboard statistics"),
            "admin-dashboard",
            "Admin Dashboard",
            "editor",
        )
        .description("Content counts, unread inquiries and subscriber growth")
        .response(single(
            Schema::object()
                .property("posts", "integer", true)
                .property("services", "integer", true)
                .property("case_studies", "integer", true)
                .property("unread_contacts", "integer", true)
                .property("subscribers", "integer", true)
                .property("recent_contacts", Schema::array_of("object"), false),
        ))
        .errors([ErrorCode::Unauthenticated]),
    );
}

fn register_inbox(registry: &mut ApiRegistry) {
    let contact = || {
        Schema::object()
            .property("id", "uuid", true)
            .property("name", "string", true)
            .property("email", "email", true)
            .property("phone", "string", false)
            .property("company", "string", false)
            .property("service", "string", false)
            .property("message", "string", true)
            .property("status", "string", true)
            .property("created_at", "datetime", true)
    };

    registry.register(
        admin(
            EndpointContract::get("/api/admin/contacts", "List contact submissions"),
            "admin-contacts",
            "Admin Inbox",
            "admin",
        )
        .query_params(list_query().property("status", "string", false))
        .response(paginated(contact()))
        .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
    );

    registry.register(
        admin(
            EndpointContract::get("/api/admin/contacts/{id}", "Show contact submission"),
            "admin-contacts",
            "Admin Inbox",
            "admin",
        )
        .path_params(id_param())
        .response(single(contact()))
        .errors([
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
            ErrorCode::ResourceNotFound,
        ]),
    );

    registry.register(
        admin(
            EndpointContract::patch("/api/admin/contacts/{id}/status", "Update contact status"),
            "admin-contacts",
            "Admin Inbox",
            "admin",
        )
        .path_params(id_param())
        .request_body(Schema::object().property_with(
            "status",
            Property::new("string")
                .required()
                .example("replied")
                .description("new, read, replied or archived"),
        ))
        .response(single(contact()))
        .errors([
            ErrorCode::ValidationError,
            ErrorCode::Unauthenticated,
            ErrorCode::ResourceNotFound,
        ]),
    );

    registry.register(
        admin(
            EndpointContract::delete("/api/admin/contacts/{id}", "Delete contact submission"),
            "admin-contacts",
            "Admin Inbox",
            "admin",
        )
        .path_params(id_param())
        .response(message())
        .errors([
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
            ErrorCode::ResourceNotFound,
        ]),
    );

    let subscriber = Schema::object()
        .property("id", "uuid", true)
        .property("email", "email", true)
        .property("name", "string", false)
        .property("subscribed_at", "datetime", true)
        .property("unsubscribed_at", "datetime", false);

    registry.register(
        admin(
            EndpointContract::get("/api/admin/newsletter/subscribers", "List subscribers"),
            "admin-newsletter",
            "Admin Newsletter",
            "admin",
        )
        .query_params(list_query().property("active", "boolean", false))
        .response(paginated(subscriber))
        .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
    );

    registry.register(
        admin(
            EndpointContract::get("/api/admin/newsletter/export", "Export subscribers"),
            "admin-newsletter",
            "Admin Newsletter",
            "admin",
        )
        .description("CSV download of active subscribers")
        .headers([("Accept", "text/csv")])
        .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
    );

    registry.register(
        admin(
            EndpointContract::delete(
                "/api/admin/newsletter/subscribers/{id}",
                "Remove subscriber",
            ),
            "admin-newsletter",
            "Admin Newsletter",
            "admin",
        )
        .path_params(id_param())
        .response(message())
        .errors([
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
            ErrorCode::ResourceNotFound,
        ]),
    );
}

fn register_chatbot_settings(registry: &mut ApiRegistry) {
    let config = || {
        Schema::object()
            .property("enabled", "boolean", true)
            .property("greeting", "string", true)
            .property("fallback_message", "string", true)
            .property("quick_replies", Schema::array_of("string"), false)
            .property("theme_color", "string", false)
            .property("ai_enabled", "boolean", false)
    };

    registry.register(
        admin(
            EndpointContract::get("/api/admin/chatbot/config", "Show chatbot configuration"),
            "admin-chatbot",
            "Admin Chatbot",
            "admin",
        )
        .response(single(config()))
        .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
    );

    registry.register(
        admin(
            EndpointContract::put("/api/admin/chatbot/config", "Update chatbot configuration"),
            "admin-chatbot",
            "Admin Chatbot",
            "admin",
        )
        .request_body(config())
        .response(single(config()))
        .errors([
            ErrorCode::ValidationError,
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
        ]),
    );
}

fn register_settings(registry: &mut ApiRegistry) {
    let general = || {
        Schema::object()
            .property("site_name", "string", true)
            .property("contact_email", "email", true)
            .property("phone", "string", false)
            .property("address", "string", false)
            .property("social_links", "object", false)
            .property("maintenance_mode", "boolean", false)
    };

    registry.register(
        admin(
            EndpointContract::get("/api/admin/settings", "Show site settings"),
            "admin-settings",
            "Admin Settings",
            "super_admin",
        )
        .response(single(general()))
        .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
    );

    registry.register(
        admin(
            EndpointContract::put("/api/admin/settings", "Update site settings"),
            "admin-settings",
            "Admin Settings",
            "super_admin",
        )
        .request_body(general())
        .response(single(general()))
        .errors([
            ErrorCode::ValidationError,
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
        ]),
    );

    let email = || {
        Schema::object()
            .property_with(
                "driver",
                Property::new("string")
                    .required()
                    .example("smtp")
                    .description("smtp, mailgun or ses"),
            )
            .property("host", "string", false)
            .property("port", "integer", false)
            .property("username", "string", false)
            .property("password", "string", false)
            .property("encryption", "string", false)
            .property("from_address", "email", true)
            .property("from_name", "string", true)
            .property("notify_address", "email", false)
    };

    registry.register(
        admin(
            EndpointContract::get("/api/admin/settings/email", "Show email settings"),
            "admin-settings",
            "Admin Settings",
            "super_admin",
        )
        .response(single(email()))
        .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
    );

    registry.register(
        admin(
            EndpointContract::put("/api/admin/settings/email", "Update email settings"),
            "admin-settings",
            "Admin Settings",
            "super_admin",
        )
        .request_body(email())
        .response(single(email()))
        .errors([
            ErrorCode::ValidationError,
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
        ]),
    );

    registry.register(
        admin(
            EndpointContract::post("/api/admin/settings/email/test", "Send test email"),
            "admin-settings",
            "Admin Settings",
            "super_admin",
        )
        .request_body(Schema::object().property("to", "email", true))
        .response(message())
        .errors([
            ErrorCode::ValidationError,
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
            ErrorCode::EmailDeliveryFailed,
        ]),
    );
}

fn register_media(registry: &mut ApiRegistry) {
    let media = || {
        Schema::object()
            .property("id", "uuid", true)
            .property("url", "url", true)
            .property("filename", "string", true)
            .property("mime_type", "string", true)
            .property("size", "integer", true)
    };

    registry.register(
        admin(
            EndpointContract::post("/api/admin/media", "Upload media"),
            "admin-media",
            "Admin Media",
            "editor",
        )
        .description("Multipart upload; images are resized into standard variants")
        .headers([("Content-Type", "multipart/form-data")])
        .request_body(
            Schema::object()
                .property_with(
                    "file",
                    Property::new("file")
                        .required()
                        .description("Image or PDF, max 10 MB"),
                )
                .property("alt", "string", false)
                .property("folder", "string", false),
        )
        .response(single(media()))
        .errors([
            ErrorCode::ValidationError,
            ErrorCode::Unauthenticated,
            ErrorCode::PayloadTooLarge,
            ErrorCode::UnsupportedMediaType,
            ErrorCode::UploadFailed,
        ]),
    );

    registry.register(
        admin(
            EndpointContract::delete("/api/admin/media/{id}", "Delete media"),
            "admin-media",
            "Admin Media",
            "editor",
        )
        .path_params(id_param())
        .response(message())
        .errors([ErrorCode::Unauthenticated, ErrorCode::ResourceNotFound]),
    );
}
