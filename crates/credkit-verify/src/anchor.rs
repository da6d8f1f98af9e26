//! Anchor verifier: the external blockchain-lookup capability.

use async_trait::async_trait;
use thiserror::Error;

use credkit_core::Evidence;

/// Failures from the anchor-verification backend.
#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("anchor backend failure: {0}")]
    Backend(String),
}

/// Blockchain anchor verification capability. Optional; the verifier
/// checks evidence structure itself and defers the chain lookup here.
#[async_trait]
pub trait AnchorVerifier: Send + Sync {
    /// Whether the anchor evidence matches what is on chain.
    async fn verify_anchor(&self, evidence: &Evidence) -> Result<bool, AnchorError>;
}
