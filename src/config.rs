use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for configuration overrides
/// (e.g. `AGENCY_API__SERVER__PORT=9000`).
pub const ENV_PREFIX: &str = "AGENCY_API";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application identity, surfaced in the discovery document and OpenAPI info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Public base URL, without the `/api` suffix
    #[serde(default = "default_app_url")]
    pub url: String,
}

fn default_app_name() -> String {
    "Agency API".to_string()
}

fn default_app_url() -> String {
    "http://localhost:8000".to_string()
}

impl AppConfig {
    /// Base URL of the versioned API, e.g. `http://localhost:8000/api/v1`
    pub fn api_base_url(&self, version: &str) -> String {
        format!("{}/api/{}", self.url.trim_end_matches('/'), version)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            url: default_app_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub versioning: VersioningConfig,
}

/// API versioning settings consumed by the registry and the version resolver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersioningConfig {
    /// When false, every contract is listed regardless of version and the
    /// default version is always resolved
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_version")]
    pub default_version: String,
    #[serde(default = "default_supported_versions")]
    pub supported_versions: Vec<String>,
    /// Request header carrying the requested version
    #[serde(default = "default_header_name")]
    pub header_name: String,
    /// Emit `X-API-Version-Warning` when a non-latest version is used
    #[serde(default = "default_true")]
    pub deprecation_warnings: bool,
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_supported_versions() -> Vec<String> {
    vec![default_version()]
}

fn default_header_name() -> String {
    "X-API-Version".to_string()
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            default_version: default_version(),
            supported_versions: default_supported_versions(),
            header_name: default_header_name(),
            deprecation_warnings: default_true(),
        }
    }
}

/// HTTP listener settings for the meta server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file under `dir` instead of stderr
    #[serde(default)]
    pub to_file: bool,

    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Project-local config file, picked up from the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("agency-api.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the service works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/agency-api/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("agency-api").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("api.versioning.supported_versions")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.logging.dir);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }
}
