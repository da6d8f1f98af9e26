//! Signer: the external key-management capability.
//!
//! Engines never hold private keys. They hand canonical bytes to a signer
//! keyed by the issuer's key reference and embed whatever signature comes
//! back. Implementations may call an HSM, a wallet, or a local keystore.

use async_trait::async_trait;

use crate::error::SignerError;

/// Signing capability. May be network-bound; may fail.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign `payload` with the key identified by `key_ref`.
    async fn sign(&self, payload: &[u8], key_ref: &str) -> Result<Vec<u8>, SignerError>;
}
