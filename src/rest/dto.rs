//! Response bodies for the meta API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success envelope: `{success: true, data, meta?}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Version information for `/api/meta/versions`
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionsResponse {
    /// Version resolved for this request
    pub current: String,
    pub default: String,
    pub latest: String,
    pub supported: Vec<String>,
    pub versioning_enabled: bool,
    /// Request header that selects a version
    pub header: String,
}

/// Derived validation rules for one contract
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationRulesResponse {
    pub method: String,
    pub path: String,
    /// `{field: "required|email"}`
    pub rules: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenApiQuery {
    /// `json` (default) or `yaml`
    pub format: Option<String>,
}
