//! Error types for schema validation.

use thiserror::Error;

use crate::validator::SchemaFormat;

/// Errors from the schema registry and validators.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Explicit-format validation was requested for a format nobody
    /// registered. An invalid argument, not a degrade condition.
    #[error("invalid argument: no validator registered for format {0}")]
    InvalidArgument(SchemaFormat),

    /// Auto-detection routed to a format nobody registered. Callers decide
    /// whether to degrade or fail.
    #[error("no validator registered for detected format {0}")]
    NoValidator(SchemaFormat),

    /// The schema definition itself does not compile.
    #[error("schema definition is invalid: {0}")]
    InvalidSchema(String),
}
