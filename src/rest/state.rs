//! Shared state for the meta API.

use std::sync::Arc;

use crate::config::Config;
use crate::contracts::ApiRegistry;
use crate::version::VersionResolver;

/// Shared state for the REST API. The registry is built once and never
/// mutated afterwards; requests pass their resolved version explicitly.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<ApiRegistry>,
    pub config: Arc<Config>,
}

impl ApiState {
    /// Build the contract catalog from config
    pub fn new(config: Config) -> Self {
        let registry = ApiRegistry::build(config.api.versioning.clone());
        Self::with_registry(config, registry)
    }

    /// Serve a pre-built registry (tests, embedders)
    pub fn with_registry(config: Config, registry: ApiRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    pub fn resolver(&self) -> &VersionResolver {
        self.registry.resolver()
    }
}
