//! Endpoint contracts: schema model, validation-rule derivation, the contract
//! builder, the registry, and the concrete catalog.

pub mod contract;
pub mod definitions;
pub mod lint;
pub mod registry;
pub mod schema;
pub mod validation;

pub use contract::{EndpointContract, EndpointDoc, HttpMethod};
pub use lint::RegistryWarning;
pub use registry::{ApiRegistry, ApiSpec, GroupedEndpoints, DEFAULT_GROUP};
pub use schema::{Primitive, Property, PropertyType, Schema};
pub use validation::{FieldError, Rule, ValidationRules};
