//! API version ordering and request version resolution.
//!
//! Versions are short tags such as `v1` or `v2.1`. They order by their
//! numeric components, so `v2 < v10` and `v1 == v1.0`.

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config::VersioningConfig;

static PATH_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"api/(v\d+)").expect("path version pattern is valid"));

#[derive(Debug, Error, PartialEq)]
pub enum VersionError {
    #[error("invalid API version '{0}'")]
    Invalid(String),
}

/// A parsed API version tag
#[derive(Debug, Clone)]
pub struct ApiVersion {
    raw: String,
    parts: Vec<u64>,
}

impl ApiVersion {
    /// Parse `v1`, `V2`, `1`, `2.1`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(VersionError::Invalid(input.to_string()));
        }

        let parts = digits
            .split('.')
            .map(|p| p.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::Invalid(input.to_string()))?;

        Ok(Self {
            raw: trimmed.to_string(),
            parts,
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ApiVersion {}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

/// Compare two version tags. Tags that do not parse compare as plain strings.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (ApiVersion::parse(a), ApiVersion::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Normalize user input: trims, lowercases, and turns a bare number into
/// `v<number>`.
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim().to_lowercase();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("v{}", trimmed)
    } else {
        trimmed
    }
}

/// Extract a version segment (`/api/v2/...`) from a request path
pub fn version_from_path(path: &str) -> Option<String> {
    PATH_VERSION
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Candidate version inputs for a request, highest precedence first
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionSources<'a> {
    /// Explicit route parameter or caller-supplied version
    pub explicit: Option<&'a str>,
    /// Request path, searched for an `api/vN` segment
    pub path: Option<&'a str>,
    /// Value of the configured version header
    pub header: Option<&'a str>,
    /// `version` query parameter
    pub query: Option<&'a str>,
}

/// Resolves the effective API version for a request
#[derive(Debug, Clone)]
pub struct VersionResolver {
    config: VersioningConfig,
}

impl VersionResolver {
    pub fn new(config: VersioningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VersioningConfig {
        &self.config
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn header_name(&self) -> &str {
        &self.config.header_name
    }

    pub fn default_version(&self) -> &str {
        &self.config.default_version
    }

    /// Supported versions, falling back to `["v1"]` when none are configured
    pub fn supported(&self) -> Vec<String> {
        if self.config.supported_versions.is_empty() {
            vec!["v1".to_string()]
        } else {
            self.config.supported_versions.clone()
        }
    }

    pub fn is_supported(&self, version: &str) -> bool {
        self.supported().iter().any(|v| v == version)
    }

    /// Highest supported version
    pub fn latest(&self) -> String {
        self.supported()
            .into_iter()
            .max_by(|a, b| compare(a, b))
            .unwrap_or_else(|| self.config.default_version.clone())
    }

    pub fn is_latest(&self, version: &str) -> bool {
        compare(version, &self.latest()) != Ordering::Less
    }

    /// Resolve with precedence explicit → path → header → query → default.
    /// Unsupported candidates are skipped rather than rejected.
    pub fn resolve(&self, sources: VersionSources<'_>) -> String {
        if !self.config.enabled {
            return self.config.default_version.clone();
        }

        let from_path = sources.path.and_then(version_from_path);
        let candidates = [
            sources.explicit.map(normalize),
            from_path.as_deref().map(normalize),
            sources.header.map(normalize),
            sources.query.map(normalize),
        ];

        for candidate in candidates.into_iter().flatten() {
            if self.is_supported(&candidate) {
                return candidate;
            }
            tracing::debug!(version = %candidate, "Ignoring unsupported API version");
        }

        self.config.default_version.clone()
    }

    /// Warning text for `X-API-Version-Warning`, if one applies
    pub fn warning(&self, version: &str) -> Option<String> {
        if !self.config.deprecation_warnings || self.is_latest(version) {
            return None;
        }
        Some(format!(
            "API version {} is not the latest. Please migrate to {}.",
            version,
            self.latest()
        ))
    }
}
