//! Schema store: the external schema-definition lookup capability.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failures from the schema-definition backend.
#[derive(Debug, Error)]
pub enum SchemaStoreError {
    #[error("schema store backend failure: {0}")]
    Backend(String),
}

/// Schema-definition lookup capability. Optional; without one the schema
/// check degrades to a warning.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Fetch the schema definition for a credential's schema reference.
    ///
    /// `Ok(None)` when no definition is known for the id.
    async fn fetch(&self, schema_id: &str) -> Result<Option<Value>, SchemaStoreError>;
}
