//! JSON Schema validator backed by the `jsonschema` crate.

use serde_json::Value;

use crate::error::SchemaError;
use crate::validator::{SchemaFormat, SchemaReport, SchemaValidator};

/// Validates documents against JSON Schema definitions. Draft detection is
/// left to the `jsonschema` crate (via `$schema`, defaulting to 2020-12).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn format(&self) -> SchemaFormat {
        SchemaFormat::JsonSchema
    }

    fn validate(&self, document: &Value, schema: &Value) -> Result<SchemaReport, SchemaError> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;

        let errors: Vec<String> = validator
            .iter_errors(document)
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(SchemaReport::conforming())
        } else {
            Ok(SchemaReport::violations(errors))
        }
    }
}
