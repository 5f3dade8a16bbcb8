//! Registry of endpoint contracts keyed by `METHOD:path`.
//!
//! The registry is assembled once by [`ApiRegistry::build`] and then shared
//! read-only (`Arc<ApiRegistry>`). Requests pass their resolved version into
//! the query methods instead of mutating registry state.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::contract::{EndpointContract, EndpointDoc, HttpMethod};
use super::definitions;
use super::lint::{self, RegistryWarning};
use crate::config::{AppConfig, VersioningConfig};
use crate::error_codes::ErrorCode;
use crate::version::VersionResolver;

/// Group used for contracts that do not name one
pub const DEFAULT_GROUP: &str = "default";

static VERSION_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/v\d+(/|$)").expect("version segment pattern is valid"));

/// Endpoint documentation grouped by resource tag, keys sorted
pub type GroupedEndpoints = BTreeMap<String, Vec<EndpointDoc>>;

#[derive(Debug, Clone)]
pub struct ApiRegistry {
    endpoints: Vec<EndpointContract>,
    index: HashMap<String, usize>,
    /// Keys whose first registration was replaced
    overwritten: Vec<String>,
    resolver: VersionResolver,
    current_version: String,
}

impl ApiRegistry {
    /// Create an empty registry
    pub fn new(versioning: VersioningConfig) -> Self {
        let current_version = versioning.default_version.clone();
        Self {
            endpoints: Vec::new(),
            index: HashMap::new(),
            overwritten: Vec::new(),
            resolver: VersionResolver::new(versioning),
            current_version,
        }
    }

    /// Build the full catalog: public, auth, admin, then AI contracts.
    /// Later groups replace earlier ones on a key collision.
    pub fn build(versioning: VersioningConfig) -> Self {
        let mut registry = Self::new(versioning);
        definitions::public::register(&mut registry);
        definitions::auth::register(&mut registry);
        definitions::admin::register(&mut registry);
        definitions::ai::register(&mut registry);
        info!(
            endpoints = registry.len(),
            overwritten = registry.overwritten.len(),
            "API contract registry built"
        );
        registry
    }

    /// Insert a contract, silently replacing any contract with the same
    /// method and path. Returns the replaced contract.
    pub fn register(&mut self, contract: EndpointContract) -> Option<EndpointContract> {
        let key = contract.key();
        match self.index.get(&key) {
            Some(&slot) => {
                debug!(key = %key, "Replacing registered contract");
                self.overwritten.push(key);
                Some(std::mem::replace(&mut self.endpoints[slot], contract))
            }
            None => {
                debug!(key = %key, "Registered contract");
                self.index.insert(key, self.endpoints.len());
                self.endpoints.push(contract);
                None
            }
        }
    }

    /// Exact lookup by method and template path
    pub fn get(&self, method: &str, path: &str) -> Option<&EndpointContract> {
        let method = HttpMethod::parse(method)?;
        self.index
            .get(&format!("{}:{}", method, path))
            .map(|&slot| &self.endpoints[slot])
    }

    /// Match a concrete request path (`/api/v2/posts/hello-world`) against
    /// registered templates (`/api/posts/{slug}`). Exact matches win, then the
    /// template with the fewest parameters.
    pub fn match_route(&self, method: &str, path: &str) -> Option<&EndpointContract> {
        let path = path.split('?').next().unwrap_or(path);
        let unversioned = VERSION_SEGMENT.replace(path, "/api$1");
        let path: &str = &unversioned;

        if let Some(contract) = self.get(method, path) {
            return Some(contract);
        }

        let method = HttpMethod::parse(method)?;
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        self.endpoints
            .iter()
            .filter(|c| c.method() == method)
            .filter_map(|c| template_params(c.path(), &segments).map(|params| (params, c)))
            .min_by_key(|(params, _)| *params)
            .map(|(_, c)| c)
    }

    pub fn set_version(&mut self, version: &str) {
        self.current_version = version.to_string();
    }

    pub fn version(&self) -> &str {
        &self.current_version
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    pub fn supported_versions(&self) -> Vec<String> {
        self.resolver.supported()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Contracts in registration order, filtered by availability when
    /// versioning is enabled and a version is given
    pub fn all(&self, version: Option<&str>) -> Vec<&EndpointContract> {
        match version {
            Some(v) if self.resolver.enabled() => self
                .endpoints
                .iter()
                .filter(|c| c.is_available_in(v))
                .collect(),
            _ => self.endpoints.iter().collect(),
        }
    }

    /// Documentation records grouped by contract group. `deprecated` is
    /// recomputed for the requested version.
    pub fn grouped(&self, version: Option<&str>) -> GroupedEndpoints {
        let mut groups = GroupedEndpoints::new();
        for contract in self.all(version) {
            let mut doc = contract.to_doc();
            if let Some(v) = version {
                doc.deprecated = contract.is_deprecated_in(v);
            }
            groups
                .entry(contract.group_name().unwrap_or(DEFAULT_GROUP).to_string())
                .or_default()
                .push(doc);
        }
        groups
    }

    /// Full discovery document for a version (current version when `None`)
    pub fn spec(&self, app: &AppConfig, version: Option<&str>) -> ApiSpec {
        let version = version.unwrap_or(self.current_version.as_str()).to_string();
        let latest = self.resolver.latest();
        let base_url = app.api_base_url(&version);

        ApiSpec {
            name: app.name.clone(),
            version: VersionInfo {
                deprecated: !self.resolver.is_latest(&version),
                current: version.clone(),
                supported: self.supported_versions(),
                default: self.resolver.default_version().to_string(),
                latest,
            },
            base_url,
            generated_at: chrono::Utc::now().to_rfc3339(),
            response_format: response_format(),
            error_codes: ErrorCode::catalog(),
            authentication: authentication_description(),
            rate_limits: rate_limit_description(),
            endpoints: self.grouped(Some(&version)),
        }
    }

    /// Permissive-registration findings: duplicates, orphan required names,
    /// out-of-range deprecations
    pub fn lint(&self) -> Vec<RegistryWarning> {
        lint::check(&self.endpoints, &self.overwritten)
    }
}

/// Number of `{param}` segments if the template matches, `None` otherwise
fn template_params(template: &str, segments: &[&str]) -> Option<usize> {
    let parts: Vec<&str> = template.trim_matches('/').split('/').collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut params = 0;
    for (part, segment) in parts.iter().zip(segments) {
        if part.starts_with('{') && part.ends_with('}') {
            if segment.is_empty() {
                return None;
            }
            params += 1;
        } else if part != segment {
            return None;
        }
    }
    Some(params)
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub current: String,
    pub supported: Vec<String>,
    pub default: String,
    pub latest: String,
    pub deprecated: bool,
}

/// Machine-readable API discovery document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSpec {
    pub name: String,
    pub version: VersionInfo,
    pub base_url: String,
    pub generated_at: String,
    pub response_format: Value,
    pub error_codes: Map<String, Value>,
    pub authentication: Value,
    pub rate_limits: Value,
    pub endpoints: GroupedEndpoints,
}

/// Envelope shapes every endpoint responds with
pub fn response_format() -> Value {
    json!({
        "success": {
            "success": true,
            "data": "mixed",
            "message": "string (optional)",
            "meta": "object (optional)"
        },
        "paginated": {
            "success": true,
            "data": "array",
            "meta": {
                "current_page": "integer",
                "per_page": "integer",
                "total": "integer",
                "last_page": "integer"
            },
            "links": {
                "first": "url",
                "last": "url",
                "prev": "url|null",
                "next": "url|null"
            }
        },
        "error": {
            "success": false,
            "error": {
                "code": "string",
                "message": "string",
                "details": "object (optional)"
            }
        }
    })
}

/// Guards and roles used across the catalog
pub fn authentication_description() -> Value {
    json!({
        "type": "bearer",
        "header": "Authorization: Bearer {token}",
        "guards": {
            "sanctum": "Personal access tokens for site users",
            "admin": "Session tokens for admin panel users"
        },
        "roles": {
            "super_admin": "Full access including user and settings management",
            "admin": "Manages content, forms and chatbot configuration",
            "editor": "Creates and edits content"
        },
        "tokenEndpoint": "/api/auth/login",
        "adminTokenEndpoint": "/api/admin/auth/login"
    })
}

/// Rate limits applied by endpoint class
pub fn rate_limit_description() -> Value {
    json!({
        "public": "60 requests per minute per IP",
        "forms": "5 requests per minute per IP",
        "auth": "10 requests per minute per IP",
        "admin": "120 requests per minute per user",
        "ai": "20 requests per minute per user",
        "headers": {
            "X-RateLimit-Limit": "Maximum requests in the current window",
            "X-RateLimit-Remaining": "Requests left in the current window",
            "Retry-After": "Seconds until the window resets (429 only)"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::schema::Schema;

    fn versioning(supported: &[&str]) -> VersioningConfig {
        VersioningConfig {
            supported_versions: supported.iter().map(|s| s.to_string()).collect(),
            ..VersioningConfig::default()
        }
    }

    fn ping() -> EndpointContract {
        EndpointContract::get("/api/ping", "Ping")
            .public()
            .group("misc")
            .versions(["v1", "v2"])
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ApiRegistry::new(versioning(&["v1"]));
        assert!(registry.register(ping()).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.get("get", "/api/ping").is_some());
        assert!(registry.get("POST", "/api/ping").is_none());
        assert!(registry.get("GET", "/api/pong").is_none());
        assert!(registry.get("TRACE", "/api/ping").is_none());
    }

    #[test]
    fn test_registration_overwrite_keeps_second() {
        let mut registry = ApiRegistry::new(versioning(&["v1"]));
        registry.register(EndpointContract::get("/api/posts", "First"));
        registry.register(EndpointContract::get("/api/other", "Other"));
        let replaced = registry.register(EndpointContract::get("/api/posts", "Second"));

        assert_eq!(replaced.unwrap().name(), "First");
        assert_eq!(registry.len(), 2);
        let all = registry.all(None);
        assert_eq!(all.len(), 2);
        // Replacement keeps the original position
        assert_eq!(all[0].name(), "Second");
        assert_eq!(
            registry.lint(),
            vec![RegistryWarning::DuplicateRegistration {
                key: "GET:/api/posts".to_string()
            }]
        );
    }

    #[test]
    fn test_grouped_end_to_end() {
        let mut registry = ApiRegistry::new(versioning(&["v1", "v2", "v3"]));
        registry.register(ping());

        let v1 = registry.grouped(Some("v1"));
        assert_eq!(v1.len(), 1);
        let docs = &v1["misc"];
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].method, HttpMethod::Get);
        assert_eq!(docs[0].path, "/api/ping");

        assert!(registry.grouped(Some("v3")).is_empty());
    }

    #[test]
    fn test_versioning_disabled_lists_everything() {
        let mut config = versioning(&["v1", "v2", "v3"]);
        config.enabled = false;
        let mut registry = ApiRegistry::new(config);
        registry.register(ping());
        assert_eq!(registry.all(Some("v3")).len(), 1);
    }

    #[test]
    fn test_grouped_sorted_with_default_group() {
        let mut registry = ApiRegistry::new(versioning(&["v1"]));
        registry.register(EndpointContract::get("/api/zeta", "Zeta").group("zeta"));
        registry.register(EndpointContract::get("/api/loose", "Loose"));
        registry.register(EndpointContract::get("/api/alpha", "Alpha").group("alpha"));

        let grouped = registry.grouped(None);
        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["alpha", "default", "zeta"]);
        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_grouped_recomputes_deprecation_per_version() {
        let mut registry = ApiRegistry::new(versioning(&["v1", "v2"]));
        registry.register(
            EndpointContract::get("/api/posts", "Posts")
                .versions(["v1", "v2"])
                .deprecated("v2", Some("Use /api/articles"), None),
        );

        let v1 = registry.grouped(Some("v1"));
        let v2 = registry.grouped(Some("v2"));
        // Registration-time deprecation details are always documented
        assert!(v1["default"][0].deprecation.is_some());
        assert!(!v1["default"][0].deprecated);
        assert!(v2["default"][0].deprecated);
    }

    #[test]
    fn test_match_route() {
        let mut registry = ApiRegistry::new(versioning(&["v1"]));
        registry.register(EndpointContract::get("/api/posts/{slug}", "Show post"));
        registry.register(EndpointContract::get("/api/posts/featured", "Featured posts"));
        registry.register(EndpointContract::get("/api/posts/{slug}/related", "Related"));

        let hit = registry.match_route("GET", "/api/v1/posts/hello-world").unwrap();
        assert_eq!(hit.name(), "Show post");

        let exact = registry.match_route("GET", "/api/posts/featured?page=2").unwrap();
        assert_eq!(exact.name(), "Featured posts");

        let nested = registry.match_route("GET", "/api/posts/x/related").unwrap();
        assert_eq!(nested.name(), "Related");

        assert!(registry.match_route("DELETE", "/api/posts/x").is_none());
        assert!(registry.match_route("GET", "/api/posts").is_none());
    }

    #[test]
    fn test_spec_document() {
        let mut registry = ApiRegistry::new(versioning(&["v1", "v2"]));
        registry.register(ping().request_body(Schema::object().property("q", "string", false)));

        let app = AppConfig::default();
        let spec = registry.spec(&app, Some("v1"));
        assert_eq!(spec.version.current, "v1");
        assert_eq!(spec.version.latest, "v2");
        assert!(spec.version.deprecated);
        assert_eq!(spec.base_url, "http://localhost:8000/api/v1");
        assert!(spec.error_codes.contains_key("VALIDATION_ERROR"));
        assert_eq!(spec.endpoints["misc"].len(), 1);

        let value = serde_json::to_value(&spec).unwrap();
        for key in [
            "name",
            "version",
            "baseUrl",
            "responseFormat",
            "errorCodes",
            "authentication",
            "rateLimits",
            "endpoints",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_spec_uses_current_version() {
        let mut registry = ApiRegistry::new(versioning(&["v1", "v2"]));
        registry.register(ping());
        registry.set_version("v2");
        assert_eq!(registry.version(), "v2");

        let spec = registry.spec(&AppConfig::default(), None);
        assert_eq!(spec.version.current, "v2");
        assert!(!spec.version.deprecated);
    }

    #[test]
    fn test_spec_base_url_ignores_trailing_slash() {
        let registry = ApiRegistry::new(versioning(&["v1"]));
        let app = AppConfig {
            url: "https://agency.example/".to_string(),
            ..AppConfig::default()
        };
        let spec = registry.spec(&app, Some("v1"));
        assert_eq!(spec.base_url, "https://agency.example/api/v1");
    }
}
