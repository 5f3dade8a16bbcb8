//! Declarative description of one API operation.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::schema::Schema;
use super::validation::ValidationRules;
use crate::error_codes::ErrorCode;
use crate::version;

/// HTTP methods a contract can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Case-insensitive parse
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Named request/response pair shown in documentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractExample {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

/// Version lifecycle of a contract
#[derive(Debug, Clone, PartialEq)]
pub struct Versioning {
    pub versions: Vec<String>,
    pub introduced_in: Option<String>,
    pub deprecated_in: Option<String>,
    pub removed_in: Option<String>,
    pub deprecation_message: Option<String>,
    pub replaced_by: Option<String>,
}

impl Default for Versioning {
    fn default() -> Self {
        Self {
            versions: vec!["v1".to_string()],
            introduced_in: Some("v1".to_string()),
            deprecated_in: None,
            removed_in: None,
            deprecation_message: None,
            replaced_by: None,
        }
    }
}

/// One API operation: identity, auth, schemas, errors and version lifecycle.
///
/// Builder methods consume and return the contract, so a contract handed to
/// the registry can no longer be changed.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointContract {
    method: HttpMethod,
    path: String,
    name: String,
    description: String,
    group: Option<String>,
    tags: Vec<String>,
    guard: Option<String>,
    role: Option<String>,
    permissions: Vec<String>,
    request_body: Option<Schema>,
    query_params: Option<Schema>,
    path_params: Option<Schema>,
    response: Option<Schema>,
    error_codes: Vec<ErrorCode>,
    headers: BTreeMap<String, String>,
    rate_limit: Option<String>,
    examples: Vec<ContractExample>,
    versioning: Versioning,
}

impl EndpointContract {
    pub fn new(method: HttpMethod, path: &str, name: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            name: name.to_string(),
            description: name.to_string(),
            group: None,
            tags: Vec::new(),
            guard: None,
            role: None,
            permissions: Vec::new(),
            request_body: None,
            query_params: None,
            path_params: None,
            response: None,
            error_codes: Vec::new(),
            headers: BTreeMap::new(),
            rate_limit: None,
            examples: Vec::new(),
            versioning: Versioning::default(),
        }
    }

    pub fn get(path: &str, name: &str) -> Self {
        Self::new(HttpMethod::Get, path, name)
    }

    pub fn post(path: &str, name: &str) -> Self {
        Self::new(HttpMethod::Post, path, name)
    }

    pub fn put(path: &str, name: &str) -> Self {
        Self::new(HttpMethod::Put, path, name)
    }

    pub fn patch(path: &str, name: &str) -> Self {
        Self::new(HttpMethod::Patch, path, name)
    }

    pub fn delete(path: &str, name: &str) -> Self {
        Self::new(HttpMethod::Delete, path, name)
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// No authentication required
    pub fn public(mut self) -> Self {
        self.guard = None;
        self
    }

    /// Require authentication through the named guard
    pub fn auth(mut self, guard: &str) -> Self {
        self.guard = Some(guard.to_string());
        self
    }

    pub fn admin_auth(self) -> Self {
        self.auth("admin")
    }

    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn request_body(mut self, schema: Schema) -> Self {
        self.request_body = Some(schema);
        self
    }

    pub fn query_params(mut self, schema: Schema) -> Self {
        self.query_params = Some(schema);
        self
    }

    pub fn path_params(mut self, schema: Schema) -> Self {
        self.path_params = Some(schema);
        self
    }

    pub fn response(mut self, schema: Schema) -> Self {
        self.response = Some(schema);
        self
    }

    pub fn errors<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = ErrorCode>,
    {
        self.error_codes = codes.into_iter().collect();
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Rate-limit label, e.g. `"60/minute"`
    pub fn rate_limit(mut self, label: &str) -> Self {
        self.rate_limit = Some(label.to_string());
        self
    }

    pub fn example(mut self, name: &str, request: Option<Value>, response: Option<Value>) -> Self {
        self.examples.push(ContractExample {
            name: name.to_string(),
            request,
            response,
        });
        self
    }

    pub fn versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versioning.versions = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the first version the contract exists in; also adds it to `versions`
    pub fn introduced_in(mut self, version: &str) -> Self {
        self.versioning.introduced_in = Some(version.to_string());
        if !self.versioning.versions.iter().any(|v| v == version) {
            self.versioning.versions.push(version.to_string());
        }
        self
    }

    /// Mark deprecated from `version` on. The version is not checked against
    /// the contract's own lifecycle; see `ApiRegistry::lint`.
    pub fn deprecated(
        mut self,
        version: &str,
        message: Option<&str>,
        replaced_by: Option<&str>,
    ) -> Self {
        self.versioning.deprecated_in = Some(version.to_string());
        self.versioning.deprecation_message = message.map(str::to_string);
        self.versioning.replaced_by = replaced_by.map(str::to_string);
        self
    }

    pub fn removed_in(mut self, version: &str) -> Self {
        self.versioning.removed_in = Some(version.to_string());
        self
    }

    /// Registry key, `METHOD:path`
    pub fn key(&self) -> String {
        format!("{}:{}", self.method, self.path)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn requires_auth(&self) -> bool {
        self.guard.is_some()
    }

    pub fn guard(&self) -> Option<&str> {
        self.guard.as_deref()
    }

    pub fn versioning(&self) -> &Versioning {
        &self.versioning
    }

    pub fn request_body_schema(&self) -> Option<&Schema> {
        self.request_body.as_ref()
    }

    /// Schema slots that are set, with their documentation names
    pub fn schemas(&self) -> Vec<(&'static str, &Schema)> {
        [
            ("pathParams", &self.path_params),
            ("queryParams", &self.query_params),
            ("requestBody", &self.request_body),
            ("response", &self.response),
        ]
        .into_iter()
        .filter_map(|(slot, schema)| schema.as_ref().map(|s| (slot, s)))
        .collect()
    }

    pub fn error_codes(&self) -> &[ErrorCode] {
        &self.error_codes
    }

    pub fn is_available_in(&self, version: &str) -> bool {
        let v = &self.versioning;
        if let Some(removed) = &v.removed_in {
            if version::compare(version, removed) != Ordering::Less {
                return false;
            }
        }
        if let Some(introduced) = &v.introduced_in {
            if version::compare(version, introduced) == Ordering::Less {
                return false;
            }
        }
        v.versions.is_empty() || v.versions.iter().any(|s| s == version)
    }

    pub fn is_deprecated_in(&self, version: &str) -> bool {
        self.versioning
            .deprecated_in
            .as_deref()
            .is_some_and(|d| version::compare(version, d) != Ordering::Less)
    }

    pub fn versioned_path(&self, version: &str) -> String {
        versioned_path(&self.path, version)
    }

    /// Rules derived from the request body, empty without one
    pub fn validation_rules(&self) -> ValidationRules {
        self.request_body
            .as_ref()
            .map(Schema::to_validation_rules)
            .unwrap_or_default()
    }

    /// Documentation record. Optional sections are omitted when empty.
    pub fn to_doc(&self) -> EndpointDoc {
        let v = &self.versioning;
        EndpointDoc {
            method: self.method,
            path: self.path.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            group: self.group.clone(),
            tags: self.tags.clone(),
            authentication: AuthDoc {
                required: self.guard.is_some(),
                guard: self.guard.clone(),
                role: self.role.clone(),
                permissions: self.permissions.clone(),
            },
            versioning: VersioningDoc {
                versions: v.versions.clone(),
                introduced_in: v.introduced_in.clone(),
                removed_in: v.removed_in.clone(),
            },
            deprecated: v.deprecated_in.is_some(),
            deprecation: v.deprecated_in.as_ref().map(|since| DeprecationDoc {
                since: since.clone(),
                message: v.deprecation_message.clone(),
                replaced_by: v.replaced_by.clone(),
            }),
            rate_limit: self.rate_limit.clone(),
            headers: self.headers.clone(),
            path_params: self.path_params.clone(),
            query_params: self.query_params.clone(),
            request_body: self.request_body.clone(),
            response: self.response.clone(),
            error_codes: self.error_codes.clone(),
            examples: self.examples.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthDoc {
    pub required: bool,
    pub guard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersioningDoc {
    pub versions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduced_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecationDoc {
    pub since: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<String>,
}

/// Insert the version after a leading `/api/`; other paths are unchanged
pub fn versioned_path(path: &str, version: &str) -> String {
    match path.strip_prefix("/api/") {
        Some(rest) => format!("/api/{}/{}", version, rest),
        None => path.to_string(),
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Serializable documentation record of a contract
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDoc {
    pub method: HttpMethod,
    pub path: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub tags: Vec<String>,
    pub authentication: AuthDoc,
    pub versioning: VersioningDoc,
    #[serde(skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<DeprecationDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_params: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_params: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub error_codes: Vec<ErrorCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ContractExample>,
}
