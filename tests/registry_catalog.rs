//! Integration tests for the built contract catalog.
//!
//! These exercise the registry through the public library API:
//! - the shipped catalog is lint-clean
//! - version filtering, grouping and deprecation recomputation
//! - validation rules derived from real contracts
//! - the OpenAPI projection of the full catalog

use std::collections::HashSet;

use serde_json::json;

use agency_api::config::{AppConfig, VersioningConfig};
use agency_api::contracts::{ApiRegistry, EndpointContract, RegistryWarning, Schema};
use agency_api::openapi;

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn versioning(supported: &[&str]) -> VersioningConfig {
    VersioningConfig {
        supported_versions: supported.iter().map(|s| s.to_string()).collect(),
        ..VersioningConfig::default()
    }
}

fn catalog() -> ApiRegistry {
    ApiRegistry::build(versioning(&["v1", "v2"]))
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

#[test]
fn test_catalog_is_lint_clean() {
    let registry = catalog();
    let warnings = registry.lint();
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
}

#[test]
fn test_catalog_covers_every_area() {
    let registry = catalog();
    for (method, path) in [
        ("GET", "/api/posts"),
        ("POST", "/api/contact"),
        ("POST", "/api/auth/login"),
        ("POST", "/api/admin/auth/login"),
        ("DELETE", "/api/admin/posts/{id}"),
        ("PUT", "/api/admin/settings/email"),
        ("POST", "/api/admin/ai/generate/post"),
        ("GET", "/api/meta/openapi"),
    ] {
        assert!(
            registry.get(method, path).is_some(),
            "missing {} {}",
            method,
            path
        );
    }
}

#[test]
fn test_admin_contracts_require_admin_guard() {
    let registry = catalog();
    for contract in registry.all(None) {
        let is_admin_area = contract.path().starts_with("/api/admin/")
            && !contract.path().starts_with("/api/admin/auth/login");
        if is_admin_area {
            assert_eq!(
                contract.guard(),
                Some("admin"),
                "{} should use the admin guard",
                contract.key()
            );
        }
    }
}

#[test]
fn test_groups_sorted_and_exhaustive() {
    let registry = catalog();
    let grouped = registry.grouped(Some("v1"));

    let keys: Vec<&String> = grouped.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let listed: usize = grouped.values().map(Vec::len).sum();
    assert_eq!(listed, registry.all(Some("v1")).len());
}

#[test]
fn test_introduced_contracts_hidden_in_earlier_versions() {
    let registry = catalog();
    let v1: HashSet<String> = registry.all(Some("v1")).iter().map(|c| c.key()).collect();
    let v2: HashSet<String> = registry.all(Some("v2")).iter().map(|c| c.key()).collect();

    assert!(!v1.contains("POST:/api/auth/refresh"));
    assert!(v2.contains("POST:/api/auth/refresh"));
    assert!(!v1.contains("POST:/api/admin/ai/translate"));
    assert!(v2.contains("POST:/api/admin/ai/translate"));
}

#[test]
fn test_legacy_blog_deprecated_only_from_v2() {
    let registry = catalog();

    let v1 = registry.grouped(Some("v1"));
    let legacy = v1["posts"]
        .iter()
        .find(|doc| doc.path == "/api/blog/posts")
        .unwrap();
    assert!(!legacy.deprecated);

    let v2 = registry.grouped(Some("v2"));
    let legacy = v2["posts"]
        .iter()
        .find(|doc| doc.path == "/api/blog/posts")
        .unwrap();
    assert!(legacy.deprecated);
    assert_eq!(
        legacy.deprecation.as_ref().unwrap().replaced_by.as_deref(),
        Some("/api/posts")
    );
}

#[test]
fn test_contact_validation_rules() {
    let registry = catalog();
    let rules = registry
        .get("POST", "/api/contact")
        .unwrap()
        .validation_rules();

    assert_eq!(rules.rule_string("name").as_deref(), Some("required|string"));
    assert_eq!(rules.rule_string("email").as_deref(), Some("required|email"));
    assert_eq!(rules.rule_string("phone").as_deref(), Some("nullable|string"));

    assert!(rules
        .check(&json!({ "name": "Ada", "email": "ada@example.com", "message": "Hi" }))
        .is_ok());

    let errors = rules
        .check(&json!({ "name": "Ada", "email": "nope" }))
        .unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, ["email", "message"]);
}

#[test]
fn test_match_route_resolves_templates() {
    let registry = catalog();
    let contract = registry
        .match_route("GET", "/api/v1/case-studies/rebrand-2024")
        .unwrap();
    assert_eq!(contract.path(), "/api/case-studies/{slug}");

    let contract = registry.match_route("GET", "/api/posts/featured").unwrap();
    assert_eq!(contract.path(), "/api/posts/featured");
}

#[test]
fn test_meta_validation_routes_documented() {
    let registry = catalog();
    let rules = registry
        .get("GET", "/api/meta/validation/{method}/{path}")
        .unwrap();
    let validate = registry
        .get("POST", "/api/meta/validation/{method}/{path}")
        .unwrap();
    assert!(!validate.requires_auth());

    for contract in [rules, validate] {
        let doc = serde_json::to_value(contract.to_doc()).unwrap();
        let path = &doc["pathParams"]["properties"]["path"];
        assert!(path["description"]
            .as_str()
            .unwrap()
            .contains("several segments"));
    }

    let doc = serde_json::to_value(validate.to_doc()).unwrap();
    assert_eq!(doc["errorCodes"], json!(["VALIDATION_ERROR", "INVALID_REQUEST", "RESOURCE_NOT_FOUND"]));
}

// ─── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn test_ping_scenario() {
    let mut registry = ApiRegistry::new(versioning(&["v1", "v2", "v3"]));
    registry.register(
        EndpointContract::get("/api/ping", "Ping")
            .group("misc")
            .versions(["v1", "v2"]),
    );

    let v1 = registry.grouped(Some("v1"));
    assert_eq!(v1.len(), 1);
    assert_eq!(v1["misc"][0].path, "/api/ping");

    let doc = serde_json::to_value(&v1["misc"][0]).unwrap();
    assert_eq!(doc["method"], "GET");
    assert_eq!(doc["authentication"]["required"], false);

    assert!(registry.grouped(Some("v3")).is_empty());
}

#[test]
fn test_duplicate_registration_is_reported() {
    let mut registry = ApiRegistry::new(versioning(&["v1"]));
    registry.register(EndpointContract::get("/api/posts", "First"));
    registry.register(EndpointContract::get("/api/posts", "Second"));

    assert_eq!(registry.all(None).len(), 1);
    assert_eq!(registry.all(None)[0].name(), "Second");
    assert_eq!(
        registry.lint(),
        vec![RegistryWarning::DuplicateRegistration {
            key: "GET:/api/posts".to_string()
        }]
    );
}

#[test]
fn test_versioning_disabled_lists_everything() {
    let config = VersioningConfig {
        enabled: false,
        ..versioning(&["v1", "v2"])
    };
    let mut registry = ApiRegistry::new(config);
    registry.register(EndpointContract::get("/api/new", "New").introduced_in("v2"));

    assert_eq!(registry.all(Some("v1")).len(), 1);
}

#[test]
fn test_orphan_required_kept_in_docs() {
    let mut registry = ApiRegistry::new(versioning(&["v1"]));
    registry.register(
        EndpointContract::post("/api/things", "Create thing")
            .request_body(Schema::object().required(["ghost"])),
    );

    let doc = serde_json::to_value(&registry.grouped(None)["default"][0]).unwrap();
    assert_eq!(doc["requestBody"]["required"], json!(["ghost"]));
    assert!(doc["requestBody"].get("properties").is_none());
    assert_eq!(registry.lint().len(), 1);
}

// ─── OpenAPI ──────────────────────────────────────────────────────────────────

#[test]
fn test_openapi_for_full_catalog() {
    let registry = catalog();
    let document = openapi::generate(&registry, &AppConfig::default(), Some("v1"));

    assert_eq!(document["openapi"], "3.0.3");
    assert_eq!(document["info"]["title"], "Agency API");

    let paths = document["paths"].as_object().unwrap();
    let item = paths["/api/v1/admin/posts"].as_object().unwrap();
    assert!(item.contains_key("get"));
    assert!(item.contains_key("post"));
    assert_eq!(item["post"]["security"][0]["bearerAuth"], json!([]));

    // operationIds must be unique across the document
    let mut ids = HashSet::new();
    for item in paths.values() {
        for operation in item.as_object().unwrap().values() {
            let id = operation["operationId"].as_str().unwrap().to_string();
            assert!(ids.insert(id.clone()), "duplicate operationId {}", id);
        }
    }
}
