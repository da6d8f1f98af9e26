//! The schema validator capability.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Supported schema formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaFormat {
    JsonSchema,
    Shacl,
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaFormat::JsonSchema => write!(f, "json-schema"),
            SchemaFormat::Shacl => write!(f, "shacl"),
        }
    }
}

impl FromStr for SchemaFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json-schema" => Ok(SchemaFormat::JsonSchema),
            "shacl" => Ok(SchemaFormat::Shacl),
            other => Err(SchemaError::InvalidSchema(format!(
                "unknown schema format: {other}"
            ))),
        }
    }
}

/// The outcome of validating a document against a schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    /// Whether the document conforms.
    pub valid: bool,

    /// Violation messages, in discovery order.
    pub errors: Vec<String>,
}

impl SchemaReport {
    /// A conforming report.
    pub fn conforming() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing report with the given violations.
    pub fn violations(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// A pluggable schema-format validator.
pub trait SchemaValidator: Send + Sync {
    /// The format this validator understands.
    fn format(&self) -> SchemaFormat;

    /// Validate `document` against `schema`.
    ///
    /// `Err` means the schema definition itself is unusable; violations in
    /// the document are reported through [`SchemaReport`].
    fn validate(&self, document: &Value, schema: &Value) -> Result<SchemaReport, SchemaError>;
}
