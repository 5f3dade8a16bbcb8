//! OpenAPI 3.0.3 projection of the contract registry.
//!
//! The document is a pure function of `ApiRegistry::grouped(version)`: one
//! path item per versioned path, one operation per method on it.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::config::AppConfig;
use crate::contracts::contract::{versioned_path, EndpointDoc};
use crate::contracts::registry::ApiRegistry;
use crate::contracts::schema::{Primitive, Property, PropertyType, Schema, SchemaKind};
use crate::error_codes::ErrorCode;

pub const OPENAPI_VERSION: &str = "3.0.3";

/// Name of the bearer security scheme referenced by authenticated operations
pub const SECURITY_SCHEME: &str = "bearerAuth";

/// Build the OpenAPI document for `version` (the registry's current version
/// when `None`).
pub fn generate(registry: &ApiRegistry, app: &AppConfig, version: Option<&str>) -> Value {
    let version = version.unwrap_or(registry.version());

    let mut paths: Map<String, Value> = Map::new();
    let mut tags: Vec<String> = Vec::new();
    let mut operation_ids: HashSet<String> = HashSet::new();

    for docs in registry.grouped(Some(version)).values() {
        for doc in docs {
            let operation = operation(doc, &mut operation_ids);

            for tag in operation_tags(doc) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }

            let path_item = paths
                .entry(versioned_path(&doc.path, version))
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(methods) = path_item {
                methods.insert(doc.method.as_str().to_lowercase(), Value::Object(operation));
            }
        }
    }

    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": app.name,
            "version": version,
            "description": format!("{} REST API ({})", app.name, version),
        },
        "servers": [
            { "url": app.url.trim_end_matches('/'), "description": format!("{} server", app.name) }
        ],
        "tags": tags.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        "paths": paths,
        "components": {
            "securitySchemes": {
                SECURITY_SCHEME: {
                    "type": "http",
                    "scheme": "bearer",
                    "description": "Token from /api/auth/login (sanctum) or /api/admin/auth/login (admin)"
                }
            }
        }
    })
}

/// Pretty-printed JSON, keys in insertion order
pub fn to_json(document: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

pub fn to_yaml(document: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

/// `method` lowercased followed by each literal path segment capitalized,
/// e.g. `GET /api/case-studies/{slug}` gives `getApiCaseStudies`.
pub fn operation_id(method: &str, path: &str) -> String {
    let mut id = method.to_lowercase();
    for segment in literal_segments(path) {
        id.push_str(&pascal_case(segment));
    }
    id
}

fn operation(doc: &EndpointDoc, seen: &mut HashSet<String>) -> Map<String, Value> {
    let mut op = Map::new();
    op.insert("summary".into(), Value::String(doc.name.clone()));
    op.insert("description".into(), Value::String(description(doc)));
    op.insert("tags".into(), json!(operation_tags(doc)));
    op.insert(
        "operationId".into(),
        Value::String(unique_operation_id(doc, seen)),
    );

    if doc.authentication.required {
        op.insert("security".into(), json!([{ SECURITY_SCHEME: [] }]));
    }

    let parameters = parameters(doc);
    if !parameters.is_empty() {
        op.insert("parameters".into(), Value::Array(parameters));
    }

    if let Some(body) = &doc.request_body {
        op.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": { content_type(body): { "schema": schema_object(body) } }
            }),
        );
    }

    op.insert("responses".into(), Value::Object(responses(doc)));

    if doc.deprecated {
        op.insert("deprecated".into(), Value::Bool(true));
    }

    op
}

fn operation_tags(doc: &EndpointDoc) -> Vec<String> {
    if !doc.tags.is_empty() {
        return doc.tags.clone();
    }
    doc.group.iter().cloned().collect()
}

fn description(doc: &EndpointDoc) -> String {
    let mut text = doc.description.clone();
    if !doc.deprecated {
        return text;
    }

    if let Some(deprecation) = &doc.deprecation {
        text.push_str(&format!("\n\n**Deprecated** since {}.", deprecation.since));
        if let Some(message) = &deprecation.message {
            text.push(' ');
            text.push_str(message);
            if !message.ends_with('.') {
                text.push('.');
            }
        }
        if let Some(replacement) = &deprecation.replaced_by {
            text.push_str(&format!(" Use `{}` instead.", replacement));
        }
    }
    text
}

/// Base id from the path; on a collision the path parameters are appended
/// (`getApiPostsBySlug`), then a numeric suffix.
fn unique_operation_id(doc: &EndpointDoc, seen: &mut HashSet<String>) -> String {
    let base = operation_id(doc.method.as_str(), &doc.path);
    let mut id = base.clone();

    if seen.contains(&id) {
        let params: Vec<String> = template_params(&doc.path)
            .map(pascal_case)
            .collect();
        if !params.is_empty() {
            id = format!("{}By{}", base, params.join("And"));
        }
    }

    let mut suffix = 2;
    let stem = id.clone();
    while seen.contains(&id) {
        id = format!("{}{}", stem, suffix);
        suffix += 1;
    }

    seen.insert(id.clone());
    id
}

fn parameters(doc: &EndpointDoc) -> Vec<Value> {
    let mut out = Vec::new();
    let mut declared: HashSet<&str> = HashSet::new();

    if let Some(schema) = &doc.path_params {
        for (name, property) in schema.properties() {
            declared.insert(name);
            out.push(parameter(name, "path", true, property));
        }
    }

    // Templates may name parameters the contract never described
    for name in template_params(&doc.path) {
        if !declared.contains(name) {
            out.push(json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" }
            }));
        }
    }

    if let Some(schema) = &doc.query_params {
        for (name, property) in schema.properties() {
            out.push(parameter(name, "query", property.required, property));
        }
    }

    out
}

fn parameter(name: &str, location: &str, required: bool, property: &Property) -> Value {
    let mut param = Map::new();
    param.insert("name".into(), Value::String(name.to_string()));
    param.insert("in".into(), Value::String(location.to_string()));
    param.insert("required".into(), Value::Bool(required));
    if let Some(description) = &property.description {
        param.insert("description".into(), Value::String(description.clone()));
    }
    param.insert("schema".into(), type_object(&property.ty));
    if let Some(example) = &property.example {
        param.insert("example".into(), example.clone());
    }
    Value::Object(param)
}

/// `200` plus one entry per declared error status. When several codes share a
/// status the first declared one describes it.
fn responses(doc: &EndpointDoc) -> Map<String, Value> {
    let mut responses = Map::new();

    let mut success = Map::new();
    success.insert(
        "description".into(),
        Value::String("Successful response".to_string()),
    );
    if let Some(schema) = &doc.response {
        success.insert(
            "content".into(),
            json!({ "application/json": { "schema": schema_object(schema) } }),
        );
    }
    responses.insert("200".into(), Value::Object(success));

    for code in &doc.error_codes {
        let status = code.http_status().to_string();
        if responses.contains_key(&status) {
            continue;
        }
        responses.insert(
            status,
            json!({
                "description": code.description(),
                "content": { "application/json": { "schema": error_schema(*code) } }
            }),
        );
    }

    responses
}

fn error_schema(code: ErrorCode) -> Value {
    json!({
        "type": "object",
        "properties": {
            "success": { "type": "boolean", "example": false },
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string", "example": code.code() },
                    "message": { "type": "string" },
                    "details": { "type": "object" }
                },
                "required": ["code", "message"]
            }
        },
        "required": ["success", "error"]
    })
}

fn content_type(body: &Schema) -> &'static str {
    let has_file = body
        .properties()
        .any(|(_, p)| p.ty.primitive() == Some(&Primitive::File));
    if has_file {
        "multipart/form-data"
    } else {
        "application/json"
    }
}

/// OpenAPI schema object for a contract schema
pub fn schema_object(schema: &Schema) -> Value {
    let mut out = Map::new();
    out.insert("type".into(), Value::String(schema.kind().as_str().to_string()));
    if let Some(description) = schema.description_text() {
        out.insert("description".into(), Value::String(description.to_string()));
    }

    match schema.kind() {
        SchemaKind::Object => {
            let properties: Map<String, Value> = schema
                .properties()
                .map(|(name, p)| (name.to_string(), property_object(p)))
                .collect();
            if !properties.is_empty() {
                out.insert("properties".into(), Value::Object(properties));
            }
            if !schema.required_names().is_empty() {
                out.insert("required".into(), json!(schema.required_names()));
            }
        }
        SchemaKind::Array => {
            let items = schema.item_type().map_or_else(|| json!({}), type_object);
            out.insert("items".into(), items);
        }
    }

    if let Some(example) = schema.example_value() {
        out.insert("example".into(), example.clone());
    }
    Value::Object(out)
}

fn property_object(property: &Property) -> Value {
    let mut value = type_object(&property.ty);
    if let Value::Object(map) = &mut value {
        if let Some(description) = &property.description {
            map.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(example) = &property.example {
            map.insert("example".into(), example.clone());
        }
    }
    value
}

fn type_object(ty: &PropertyType) -> Value {
    match ty {
        PropertyType::Nested(schema) => schema_object(schema),
        PropertyType::Primitive { primitive, .. } => match primitive {
            Primitive::String => json!({ "type": "string" }),
            Primitive::Integer => json!({ "type": "integer" }),
            Primitive::Number => json!({ "type": "number" }),
            Primitive::Boolean => json!({ "type": "boolean" }),
            Primitive::Array => json!({ "type": "array", "items": {} }),
            Primitive::Object => json!({ "type": "object" }),
            Primitive::Email => json!({ "type": "string", "format": "email" }),
            Primitive::Uuid => json!({ "type": "string", "format": "uuid" }),
            Primitive::Url => json!({ "type": "string", "format": "uri" }),
            Primitive::Date => json!({ "type": "string", "format": "date" }),
            Primitive::DateTime => json!({ "type": "string", "format": "date-time" }),
            Primitive::File => json!({ "type": "string", "format": "binary" }),
            Primitive::Other(tag) => json!({ "type": "string", "format": tag }),
        },
    }
}

fn literal_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter(|s| !s.is_empty() && !(s.starts_with('{') && s.ends_with('}')))
}

fn template_params(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter_map(|s| s.strip_prefix('{').and_then(|s| s.strip_suffix('}')))
}

/// `case-studies` -> `CaseStudies`
fn pascal_case(segment: &str) -> String {
    segment
        .split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VersioningConfig;
    use crate::contracts::contract::EndpointContract;

    fn registry(supported: &[&str]) -> ApiRegistry {
        ApiRegistry::new(VersioningConfig {
            supported_versions: supported.iter().map(|s| s.to_string()).collect(),
            ..VersioningConfig::default()
        })
    }

    #[test]
    fn test_operation_id() {
        assert_eq!(operation_id("GET", "/api/posts"), "getApiPosts");
        assert_eq!(
            operation_id("DELETE", "/api/case-studies/{id}"),
            "deleteApiCaseStudies"
        );
        assert_eq!(operation_id("POST", "/"), "post");
    }

    #[test]
    fn test_shared_path_yields_one_path_item() {
        let mut reg = registry(&["v1"]);
        reg.register(EndpointContract::get("/api/posts", "List posts").group("posts"));
        reg.register(EndpointContract::post("/api/posts", "Create post").group("posts"));

        let doc = generate(&reg, &AppConfig::default(), Some("v1"));
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 1);

        let item = paths["/api/v1/posts"].as_object().unwrap();
        assert_eq!(item.len(), 2);
        assert_eq!(item["get"]["operationId"], "getApiPosts");
        assert_eq!(item["post"]["operationId"], "postApiPosts");
    }

    #[test]
    fn test_colliding_operation_ids_are_disambiguated() {
        let mut reg = registry(&["v1"]);
        reg.register(EndpointContract::get("/api/posts", "List"));
        reg.register(EndpointContract::get("/api/posts/{slug}", "Show"));

        let doc = generate(&reg, &AppConfig::default(), Some("v1"));
        assert_eq!(doc["paths"]["/api/v1/posts"]["get"]["operationId"], "getApiPosts");
        assert_eq!(
            doc["paths"]["/api/v1/posts/{slug}"]["get"]["operationId"],
            "getApiPostsBySlug"
        );
    }

    #[test]
    fn test_security_and_parameters() {
        let mut reg = registry(&["v1"]);
        reg.register(
            EndpointContract::put("/api/admin/posts/{id}", "Update post")
                .admin_auth()
                .query_params(Schema::object().property("notify", "boolean", false))
                .request_body(Schema::object().property("title", "string", true)),
        );

        let doc = generate(&reg, &AppConfig::default(), Some("v1"));
        let op = &doc["paths"]["/api/v1/admin/posts/{id}"]["put"];
        assert_eq!(op["security"], json!([{ "bearerAuth": [] }]));

        let params = op["parameters"].as_array().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["name"], "id");
        assert_eq!(params[0]["in"], "path");
        assert_eq!(params[0]["required"], true);
        assert_eq!(params[1]["name"], "notify");
        assert_eq!(params[1]["in"], "query");
        assert_eq!(params[1]["schema"]["type"], "boolean");

        let body = &op["requestBody"]["content"]["application/json"]["schema"];
        assert_eq!(body["required"], json!(["title"]));
        assert_eq!(
            doc["components"]["securitySchemes"]["bearerAuth"]["scheme"],
            "bearer"
        );
    }

    #[test]
    fn test_public_operation_has_no_security() {
        let mut reg = registry(&["v1"]);
        reg.register(EndpointContract::get("/api/ping", "Ping"));
        let doc = generate(&reg, &AppConfig::default(), Some("v1"));
        assert!(doc["paths"]["/api/v1/ping"]["get"].get("security").is_none());
    }

    #[test]
    fn test_error_responses_deduplicated_by_status() {
        let mut reg = registry(&["v1"]);
        reg.register(EndpointContract::post("/api/auth/login", "Login").errors([
            ErrorCode::InvalidCredentials,
            ErrorCode::Unauthenticated,
            ErrorCode::ValidationError,
        ]));

        let doc = generate(&reg, &AppConfig::default(), Some("v1"));
        let responses = doc["paths"]["/api/v1/auth/login"]["post"]["responses"]
            .as_object()
            .unwrap();
        let statuses: Vec<&str> = responses.keys().map(String::as_str).collect();
        assert_eq!(statuses, ["200", "401", "422"]);
        assert_eq!(
            responses["401"]["description"],
            ErrorCode::InvalidCredentials.description()
        );
    }

    #[test]
    fn test_deprecation_note() {
        let mut reg = registry(&["v1", "v2"]);
        reg.register(
            EndpointContract::get("/api/blog/posts", "Legacy posts")
                .versions(["v1", "v2"])
                .deprecated("v2", Some("Blog prefix retired"), Some("/api/posts")),
        );

        let v1 = generate(&reg, &AppConfig::default(), Some("v1"));
        let op = &v1["paths"]["/api/v1/blog/posts"]["get"];
        assert!(op.get("deprecated").is_none());
        assert_eq!(op["description"], "Legacy posts");

        let v2 = generate(&reg, &AppConfig::default(), Some("v2"));
        let op = &v2["paths"]["/api/v2/blog/posts"]["get"];
        assert_eq!(op["deprecated"], true);
        let text = op["description"].as_str().unwrap();
        assert!(text.contains("**Deprecated** since v2."));
        assert!(text.contains("Blog prefix retired."));
        assert!(text.contains("Use `/api/posts` instead."));
    }

    #[test]
    fn test_version_filtering() {
        let mut reg = registry(&["v1", "v2"]);
        reg.register(EndpointContract::get("/api/posts", "Posts").versions(["v1", "v2"]));
        reg.register(EndpointContract::post("/api/auth/refresh", "Refresh").introduced_in("v2"));

        let v1 = generate(&reg, &AppConfig::default(), Some("v1"));
        assert!(v1["paths"].get("/api/v1/auth/refresh").is_none());

        let v2 = generate(&reg, &AppConfig::default(), Some("v2"));
        assert!(v2["paths"].get("/api/v2/auth/refresh").is_some());
        assert_eq!(v2["info"]["version"], "v2");
    }

    #[test]
    fn test_schema_formats() {
        let schema = Schema::object()
            .property("email", "email", true)
            .property("tags", Schema::array_of("string"), false)
            .property("legacy", "foo", false);
        let value = schema_object(&schema);
        assert_eq!(value["properties"]["email"]["format"], "email");
        assert_eq!(value["properties"]["tags"]["items"]["type"], "string");
        assert_eq!(value["properties"]["legacy"]["format"], "foo");
    }

    #[test]
    fn test_file_upload_uses_multipart() {
        let mut reg = registry(&["v1"]);
        reg.register(
            EndpointContract::post("/api/admin/media", "Upload")
                .request_body(Schema::object().property("file", "file", true)),
        );
        let doc = generate(&reg, &AppConfig::default(), Some("v1"));
        let content = &doc["paths"]["/api/v1/admin/media"]["post"]["requestBody"]["content"];
        assert!(content.get("multipart/form-data").is_some());
    }

    #[test]
    fn test_json_output_keeps_key_order() {
        let reg = registry(&["v1"]);
        let doc = generate(&reg, &AppConfig::default(), Some("v1"));
        let json = to_json(&doc).unwrap();
        assert!(json.starts_with("{\n  \"openapi\": \"3.0.3\""));
        assert!(json.find("\"info\"").unwrap() < json.find("\"paths\"").unwrap());
        assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), doc);
    }

    #[test]
    fn test_yaml_output() {
        let reg = registry(&["v1"]);
        let doc = generate(&reg, &AppConfig::default(), None);
        let yaml = to_yaml(&doc).unwrap();
        assert!(yaml.starts_with("openapi:"));
        assert!(yaml.contains("3.0.3"));
        assert_eq!(doc["info"]["version"], "v1");
    }
}
