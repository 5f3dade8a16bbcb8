//! Agency API - self-describing contract registry for the agency CMS backend.
//!
//! Endpoint contracts (schemas, auth, error codes, version lifecycle) are
//! declared once in [`contracts::definitions`] and projected into a discovery
//! document, grouped documentation, validation rules and OpenAPI 3.0.3.

pub mod config;
pub mod contracts;
pub mod error_codes;
pub mod logging;
pub mod openapi;
pub mod rest;
pub mod version;

pub use config::Config;
pub use contracts::{ApiRegistry, EndpointContract, Schema};
pub use error_codes::ErrorCode;
pub use version::VersionResolver;
