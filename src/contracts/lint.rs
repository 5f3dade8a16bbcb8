//! Warnings for catalog mistakes that registration tolerates.

use std::cmp::Ordering;
use std::fmt;

use super::contract::EndpointContract;
use crate::version;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryWarning {
    /// A later registration replaced an earlier one with the same key
    DuplicateRegistration { key: String },
    /// A schema lists a required name that has no property
    OrphanRequired {
        key: String,
        slot: &'static str,
        field: String,
    },
    /// Deprecation version falls before introduction or at/after removal
    DeprecationOutOfRange { key: String, deprecated_in: String },
}

impl fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryWarning::DuplicateRegistration { key } => {
                write!(f, "{} registered more than once; last registration wins", key)
            }
            RegistryWarning::OrphanRequired { key, slot, field } => {
                write!(
                    f,
                    "{} {} requires '{}' but declares no such property",
                    key, slot, field
                )
            }
            RegistryWarning::DeprecationOutOfRange { key, deprecated_in } => {
                write!(
                    f,
                    "{} deprecated in {} which is outside its version range",
                    key, deprecated_in
                )
            }
        }
    }
}

pub(crate) fn check(contracts: &[EndpointContract], overwritten: &[String]) -> Vec<RegistryWarning> {
    let mut warnings: Vec<RegistryWarning> = overwritten
        .iter()
        .map(|key| RegistryWarning::DuplicateRegistration { key: key.clone() })
        .collect();

    for contract in contracts {
        let key = contract.key();

        for (slot, schema) in contract.schemas() {
            for field in schema.orphan_required() {
                warnings.push(RegistryWarning::OrphanRequired {
                    key: key.clone(),
                    slot,
                    field: field.to_string(),
                });
            }
        }

        let v = contract.versioning();
        if let Some(deprecated) = &v.deprecated_in {
            let before_intro = v
                .introduced_in
                .as_deref()
                .is_some_and(|i| version::compare(deprecated, i) == Ordering::Less);
            let after_removal = v
                .removed_in
                .as_deref()
                .is_some_and(|r| version::compare(deprecated, r) != Ordering::Less);
            if before_intro || after_removal {
                warnings.push(RegistryWarning::DeprecationOutOfRange {
                    key: key.clone(),
                    deprecated_in: deprecated.clone(),
                });
            }
        }
    }

    warnings
}
