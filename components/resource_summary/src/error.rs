//! Error types for resource summaries

use crate::types::BudgetResourceType;
use network_records::RecordParsingError;
use thiserror::Error;

/// Errors in a budget configuration
#[derive(Error, Debug)]
pub enum BudgetConfigError {
    /// Budget JSON does not deserialize
    #[error("Invalid budget JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Budget path violates the path grammar
    #[error("Invalid path {path}. {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// First-party hostname pattern is malformed
    #[error("{0} is not a valid hostname.")]
    InvalidHostname(String),

    /// A resource type is budgeted twice in the same list
    #[error("{resource_type} has duplicate entry in {list}")]
    DuplicateResourceType {
        resource_type: BudgetResourceType,
        list: &'static str,
    },

    /// A timing metric is budgeted twice
    #[error("{0} has duplicate entry in timings")]
    DuplicateTimingMetric(String),

    /// Budget value is negative or not a number
    #[error("Invalid budget value {value} for {name}")]
    InvalidBudgetValue { name: String, value: f64 },
}

/// Errors while building an entity classification
#[derive(Error, Debug)]
pub enum EntityClassificationError {
    /// Entity declared without any domain
    #[error("Entity {0} has no domains")]
    EmptyEntity(String),

    /// Entity domain is empty or contains URL syntax
    #[error("Invalid domain {domain:?} for entity {entity}")]
    InvalidDomain { entity: String, domain: String },
}

/// Errors surfaced by the resource summary artifact
///
/// The summary itself never fails; every variant wraps a collaborator error
/// unchanged.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error(transparent)]
    Records(#[from] RecordParsingError),

    #[error(transparent)]
    Budget(#[from] BudgetConfigError),

    #[error(transparent)]
    EntityClassification(#[from] EntityClassificationError),

    /// Inputs could not be serialized into a cache key
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for resource summary operations
pub type Result<T> = std::result::Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetConfigError::InvalidHostname("*.foo/*".to_string());
        assert_eq!(err.to_string(), "*.foo/* is not a valid hostname.");

        let err = BudgetConfigError::DuplicateResourceType {
            resource_type: BudgetResourceType::ThirdParty,
            list: "resourceSizes",
        };
        assert_eq!(
            err.to_string(),
            "third-party has duplicate entry in resourceSizes"
        );

        let err = EntityClassificationError::EmptyEntity("Acme".to_string());
        assert_eq!(err.to_string(), "Entity Acme has no domains");
    }

    #[test]
    fn test_summary_error_is_transparent() {
        let inner = BudgetConfigError::InvalidPath {
            path: "cat".to_string(),
            reason: "'Path' should start with '/'.",
        };
        let expected = inner.to_string();
        let err: SummaryError = inner.into();
        assert_eq!(err.to_string(), expected);
    }
}
