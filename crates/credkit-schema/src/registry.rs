//! Format-keyed schema validator registry and format auto-detection.
//!
//! An explicit, constructible object injected into the verifier, never an
//! ambient singleton; tests construct fresh isolated instances instead of
//! sharing one and calling `clear()`.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::error::SchemaError;
use crate::json_schema::JsonSchemaValidator;
use crate::validator::{SchemaFormat, SchemaReport, SchemaValidator};

const SHACL_MARKERS: [&str; 3] = ["sh:targetClass", "sh:property", "sh:node"];
const JSON_SCHEMA_MARKERS: [&str; 3] = ["$schema", "type", "properties"];

/// Detect the format of a schema definition.
///
/// SHACL markers (`sh:targetClass`, `sh:property`, `sh:node`) win; JSON
/// Schema markers (`$schema`, `type`, `properties`) come next; anything
/// else, including an empty document, defaults to JSON Schema.
pub fn detect_schema_format(schema: &Value) -> SchemaFormat {
    if has_shacl_marker(schema) {
        return SchemaFormat::Shacl;
    }
    if let Some(map) = schema.as_object() {
        if JSON_SCHEMA_MARKERS.iter().any(|m| map.contains_key(*m)) {
            return SchemaFormat::JsonSchema;
        }
    }
    SchemaFormat::JsonSchema
}

/// Look for SHACL marker keys at the top level or inside `@graph` shapes.
fn has_shacl_marker(schema: &Value) -> bool {
    let Some(map) = schema.as_object() else {
        return false;
    };
    if SHACL_MARKERS.iter().any(|m| map.contains_key(*m)) {
        return true;
    }
    map.get("@graph")
        .and_then(Value::as_array)
        .is_some_and(|shapes| {
            shapes.iter().any(|shape| {
                shape
                    .as_object()
                    .is_some_and(|s| SHACL_MARKERS.iter().any(|m| s.contains_key(*m)))
            })
        })
}

/// Maps a schema format to the validator that handles it.
#[derive(Default)]
pub struct SchemaRegistry {
    validators: RwLock<HashMap<SchemaFormat, Arc<dyn SchemaValidator>>>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the bundled JSON Schema validator registered.
    /// SHACL stays interface-only; register your own validator for it.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(JsonSchemaValidator::new()));
        registry
    }

    /// Register a validator under its own format, replacing any previous
    /// one.
    pub fn register(&self, validator: Arc<dyn SchemaValidator>) {
        self.write().insert(validator.format(), validator);
    }

    /// Remove and return the validator for a format.
    pub fn unregister(&self, format: SchemaFormat) -> Option<Arc<dyn SchemaValidator>> {
        self.write().remove(&format)
    }

    /// Look up the validator for a format.
    pub fn get(&self, format: SchemaFormat) -> Option<Arc<dyn SchemaValidator>> {
        self.read().get(&format).cloned()
    }

    /// Whether a format has a validator.
    pub fn has_validator(&self, format: SchemaFormat) -> bool {
        self.read().contains_key(&format)
    }

    /// The registered formats.
    pub fn registered_formats(&self) -> Vec<SchemaFormat> {
        self.read().keys().copied().collect()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Validate a document against a schema definition.
    ///
    /// With an explicit `format`, a missing validator is an
    /// `InvalidArgument` failure. With `None`, the format is auto-detected
    /// and a missing validator surfaces as `NoValidator`, which callers may
    /// degrade.
    pub fn validate(
        &self,
        document: &Value,
        schema: &Value,
        format: Option<SchemaFormat>,
    ) -> Result<SchemaReport, SchemaError> {
        match format {
            Some(format) => {
                let validator = self
                    .get(format)
                    .ok_or(SchemaError::InvalidArgument(format))?;
                validator.validate(document, schema)
            }
            None => {
                let format = detect_schema_format(schema);
                let validator = self.get(format).ok_or(SchemaError::NoValidator(format))?;
                validator.validate(document, schema)
            }
        }
    }

    /// Validate just a credential-subject document. The subject is the part
    /// schemas in the wild constrain, so this is the entry point verifiers
    /// use.
    pub fn validate_subject(
        &self,
        subject_document: &Value,
        schema: &Value,
        format: Option<SchemaFormat>,
    ) -> Result<SchemaReport, SchemaError> {
        self.validate(subject_document, schema, format)
    }

    fn read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<SchemaFormat, Arc<dyn SchemaValidator>>> {
        self.validators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<SchemaFormat, Arc<dyn SchemaValidator>>> {
        self.validators
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_shacl_markers() {
        assert_eq!(
            detect_schema_format(&json!({"sh:targetClass": "ex:Person"})),
            SchemaFormat::Shacl
        );
        assert_eq!(
            detect_schema_format(&json!({"sh:property": []})),
            SchemaFormat::Shacl
        );
        assert_eq!(
            detect_schema_format(&json!({"sh:node": {}})),
            SchemaFormat::Shacl
        );
        assert_eq!(
            detect_schema_format(&json!({
                "@graph": [{"sh:targetClass": "ex:Person"}]
            })),
            SchemaFormat::Shacl
        );
    }

    #[test]
    fn test_detect_json_schema_markers() {
        assert_eq!(
            detect_schema_format(&json!({"$schema": "https://json-schema.org/draft/2020-12/schema"})),
            SchemaFormat::JsonSchema
        );
        assert_eq!(
            detect_schema_format(&json!({"type": "object"})),
            SchemaFormat::JsonSchema
        );
        assert_eq!(
            detect_schema_format(&json!({"properties": {}})),
            SchemaFormat::JsonSchema
        );
    }

    #[test]
    fn test_detect_defaults_to_json_schema() {
        assert_eq!(detect_schema_format(&json!({})), SchemaFormat::JsonSchema);
        assert_eq!(
            detect_schema_format(&json!({"unrelated": 1})),
            SchemaFormat::JsonSchema
        );
    }

    #[test]
    fn test_registry_lifecycle() {
        let registry = SchemaRegistry::new();
        assert!(!registry.has_validator(SchemaFormat::JsonSchema));

        registry.register(Arc::new(JsonSchemaValidator::new()));
        assert!(registry.has_validator(SchemaFormat::JsonSchema));
        assert_eq!(registry.registered_formats(), vec![SchemaFormat::JsonSchema]);

        assert!(registry.unregister(SchemaFormat::JsonSchema).is_some());
        assert!(registry.registered_formats().is_empty());

        registry.register(Arc::new(JsonSchemaValidator::new()));
        registry.clear();
        assert!(!registry.has_validator(SchemaFormat::JsonSchema));
    }

    #[test]
    fn test_validate_autodetect() {
        let registry = SchemaRegistry::with_defaults();
        let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});

        let report = registry
            .validate(&json!({"name": "John Doe"}), &schema, None)
            .unwrap();
        assert!(report.valid);

        let report = registry
            .validate(&json!({"name": 5}), &schema, None)
            .unwrap();
        assert!(!report.valid);
    }

    #[test]
    fn test_explicit_format_without_validator_is_invalid_argument() {
        let registry = SchemaRegistry::with_defaults();
        let err = registry
            .validate(&json!({}), &json!({}), Some(SchemaFormat::Shacl))
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidArgument(SchemaFormat::Shacl)
        ));
    }

    #[test]
    fn test_autodetected_shacl_without_validator() {
        let registry = SchemaRegistry::with_defaults();
        let err = registry
            .validate(&json!({}), &json!({"sh:targetClass": "ex:Person"}), None)
            .unwrap_err();
        assert!(matches!(err, SchemaError::NoValidator(SchemaFormat::Shacl)));
    }

    #[test]
    fn test_validate_subject() {
        let registry = SchemaRegistry::with_defaults();
        let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
        let report = registry
            .validate_subject(&json!({"name": "John Doe"}), &schema, None)
            .unwrap();
        assert!(report.valid);
    }
}
