//! Concrete endpoint catalog, one module per product area.
//!
//! Each module exposes `register(&mut ApiRegistry)`;
//! [`ApiRegistry::build`](super::ApiRegistry::build) calls them in a fixed
//! order (public, auth, admin, AI).

pub mod admin;
pub mod ai;
pub mod auth;
pub mod public;

use super::schema::{Property, Schema};

/// `page` / `per_page` query parameters shared by list endpoints
pub(crate) fn pagination_query() -> Schema {
    Schema::object()
        .property_with(
            "page",
            Property::new("integer").example(1).description("Page number"),
        )
        .property_with(
            "per_page",
            Property::new("integer")
                .example(15)
                .description("Items per page (max 100)"),
        )
}

/// List filters on top of pagination
pub(crate) fn list_query() -> Schema {
    pagination_query()
        .property("search", "string", false)
        .property_with(
            "sort",
            Property::new("string")
                .example("-published_at")
                .description("Sort field, prefix with '-' for descending"),
        )
}

pub(crate) fn slug_param() -> Schema {
    Schema::object().property_with(
        "slug",
        Property::new("string")
            .required()
            .example("brand-refresh-2024"),
    )
}

pub(crate) fn id_param() -> Schema {
    Schema::object().property_with(
        "id",
        Property::new("uuid")
            .required()
            .example("9b2f7c1e-3d4a-4f6b-8e21-5a7c9d0e1f23"),
    )
}

/// `{data: [item], meta, links}` list envelope
pub(crate) fn paginated(item: Schema) -> Schema {
    Schema::object()
        .property("data", Schema::array_of(item), true)
        .property(
            "meta",
            Schema::object()
                .property("current_page", "integer", true)
                .property("per_page", "integer", true)
                .property("total", "integer", true)
                .property("last_page", "integer", true),
            true,
        )
        .property("links", "object", false)
}

/// `{data: item}` single-resource envelope
pub(crate) fn single(item: Schema) -> Schema {
    Schema::object().property("data", item, true)
}

/// `{message}` acknowledgement body
pub(crate) fn message() -> Schema {
    Schema::object().property_with(
        "message",
        Property::new("string").required().example("Operation completed"),
    )
}

/// SEO metadata block shared by content types
pub(crate) fn seo() -> Schema {
    Schema::object()
        .describe("SEO metadata")
        .property("meta_title", "string", false)
        .property("meta_description", "string", false)
        .property("og_image", "url", false)
        .property("canonical_url", "url", false)
}

pub(crate) fn post() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property_with(
            "title",
            Property::new("string").required().example("Rebranding a Fintech"),
        )
        .property("slug", "string", true)
        .property("excerpt", "string", false)
        .property("content", "string", true)
        .property("cover_image", "url", false)
        .property("category", "string", false)
        .property("tags", Schema::array_of("string"), false)
        .property("author", "string", false)
        .property("reading_time", "integer", false)
        .property("is_featured", "boolean", false)
        .property("published_at", "datetime", false)
        .property("seo", seo(), false)
}

pub(crate) fn category() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property("name", "string", true)
        .property("slug", "string", true)
        .property("description", "string", false)
        .property("posts_count", "integer", false)
}

pub(crate) fn service() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property("title", "string", true)
        .property("slug", "string", true)
        .property("summary", "string", false)
        .property("description", "string", false)
        .property("icon", "string", false)
        .property("features", Schema::array_of("string"), false)
        .property("starting_price", "number", false)
        .property("sort_order", "integer", false)
        .property("seo", seo(), false)
}

pub(crate) fn case_study() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property("title", "string", true)
        .property("slug", "string", true)
        .property("client", "string", true)
        .property("industry", "string", false)
        .property("challenge", "string", false)
        .property("solution", "string", false)
        .property("results", Schema::array_of("string"), false)
        .property("cover_image", "url", false)
        .property("gallery", Schema::array_of("url"), false)
        .property("services", Schema::array_of("string"), false)
        .property("completed_at", "date", false)
        .property("seo", seo(), false)
}

pub(crate) fn testimonial() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property("author_name", "string", true)
        .property("author_title", "string", false)
        .property("company", "string", false)
        .property("quote", "string", true)
        .property("rating", "integer", false)
        .property("avatar", "url", false)
        .property("is_featured", "boolean", false)
}

pub(crate) fn brand() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property("name", "string", true)
        .property("logo", "url", true)
        .property("website", "url", false)
        .property("sort_order", "integer", false)
}

pub(crate) fn user() -> Schema {
    Schema::object()
        .property("id", "uuid", true)
        .property("name", "string", true)
        .property("email", "email", true)
        .property("created_at", "datetime", false)
}

/// Token issued by login endpoints
pub(crate) fn token() -> Schema {
    Schema::object()
        .property_with(
            "token",
            Property::new("string")
                .required()
                .example("1|q8Hc2Yl0Y5n1...")
                .description("Bearer token"),
        )
        .property_with(
            "token_type",
            Property::new("string").required().example("Bearer"),
        )
        .property("expires_at", "datetime", false)
}
