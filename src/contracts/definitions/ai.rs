//! AI-assisted content tooling for the admin panel.

use serde_json::json;

use super::{single, user};
use crate::contracts::contract::EndpointContract;
use crate::contracts::registry::ApiRegistry;
use crate::contracts::schema::{Property, Schema};
use crate::error_codes::ErrorCode;

const AI_RATE: &str = "20/minute";

fn ai(contract: EndpointContract) -> EndpointContract {
    contract
        .group("ai")
        .tags(["AI Assistant"])
        .admin_auth()
        .role("editor")
        .permissions(["ai.use"])
        .rate_limit(AI_RATE)
        .errors([
            ErrorCode::ValidationError,
            ErrorCode::Unauthenticated,
            ErrorCode::InsufficientRole,
            ErrorCode::AiQuotaExceeded,
            ErrorCode::AiProviderError,
        ])
}

fn generation() -> Schema {
    Schema::object()
        .property("content", "string", true)
        .property("model", "string", true)
        .property_with(
            "tokens_used",
            Property::new("integer").required().example(812),
        )
}

pub fn register(registry: &mut ApiRegistry) {
    registry.register(
        ai(EndpointContract::post(
            "/api/admin/ai/generate/post",
            "Generate blog post draft",
        ))
        .description("Drafts a post from a topic and outline")
        .request_body(
            Schema::object()
                .property_with(
                    "topic",
                    Property::new("string")
                        .required()
                        .example("Why brand audits matter"),
                )
                .property("outline", Schema::array_of("string"), false)
                .property_with(
                    "tone",
                    Property::new("string")
                        .example("professional")
                        .description("professional, friendly or playful"),
                )
                .property("word_count", "integer", false)
                .property("language", "string", false),
        )
        .response(single(
            generation()
                .property("title", "string", true)
                .property("excerpt", "string", false),
        ))
        .example(
            "short draft",
            Some(json!({ "topic": "Why brand audits matter", "word_count": 400 })),
            None,
        ),
    );

    registry.register(
        ai(EndpointContract::post(
            "/api/admin/ai/generate/seo",
            "Generate SEO metadata",
        ))
        .request_body(
            Schema::object()
                .property("title", "string", true)
                .property("content", "string", true)
                .property("keywords", Schema::array_of("string"), false),
        )
        .response(single(
            Schema::object()
                .property("meta_title", "string", true)
                .property("meta_description", "string", true)
                .property("keywords", Schema::array_of("string"), false)
                .property("tokens_used", "integer", true),
        )),
    );

    registry.register(
        ai(EndpointContract::post(
            "/api/admin/ai/improve",
            "Improve text",
        ))
        .description("Rewrite a passage for clarity, tone or length")
        .request_body(
            Schema::object()
                .property("text", "string", true)
                .property_with(
                    "instruction",
                    Property::new("string")
                        .required()
                        .example("Make it shorter"),
                ),
        )
        .response(single(generation())),
    );

    registry.register(
        ai(EndpointContract::post(
            "/api/admin/ai/translate",
            "Translate content",
        ))
        .introduced_in("v2")
        .request_body(
            Schema::object()
                .property("text", "string", true)
                .property_with(
                    "target_language",
                    Property::new("string").required().example("de"),
                )
                .property("source_language", "string", false),
        )
        .response(single(generation())),
    );

    registry.register(
        EndpointContract::get("/api/admin/ai/usage", "AI usage summary")
            .description("Token usage for the current billing period")
            .group("ai")
            .tags(["AI Assistant"])
            .admin_auth()
            .role("admin")
            .rate_limit(AI_RATE)
            .query_params(
                Schema::object()
                    .property("from", "date", false)
                    .property("to", "date", false),
            )
            .response(single(
                Schema::object()
                    .property("tokens_used", "integer", true)
                    .property("token_limit", "integer", true)
                    .property("requests", "integer", true)
                    .property("by_user", Schema::array_of(user().property("tokens_used", "integer", true)), false),
            ))
            .errors([ErrorCode::Unauthenticated, ErrorCode::InsufficientRole]),
    );
}
