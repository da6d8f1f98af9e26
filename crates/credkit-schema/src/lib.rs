//! # credkit-schema
//!
//! Schema conformance for credkit: a format-keyed validator registry with
//! auto-detection between SHACL and JSON Schema definitions.
//!
//! The bundled [`JsonSchemaValidator`] covers JSON Schema; SHACL is routed
//! by detection but validated only if a caller registers an implementation.

pub mod error;
pub mod json_schema;
pub mod registry;
pub mod validator;

pub use error::SchemaError;
pub use json_schema::JsonSchemaValidator;
pub use registry::{detect_schema_format, SchemaRegistry};
pub use validator::{SchemaFormat, SchemaReport, SchemaValidator};
