//! Status list: the external revocation-index capability.

use async_trait::async_trait;
use thiserror::Error;

use credkit_core::StatusRef;

/// Failures from the status-list backend.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("status list backend failure: {0}")]
    Backend(String),
}

/// Revocation lookup capability. Optional: a verifier without one degrades
/// the revocation check to a warning.
#[async_trait]
pub trait StatusList: Send + Sync {
    /// Whether the entry at `index` of the referenced list is revoked.
    async fn is_revoked(&self, status: &StatusRef, index: Option<u64>) -> Result<bool, StatusError>;
}
