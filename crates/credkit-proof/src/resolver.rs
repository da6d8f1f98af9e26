//! Resolver: the external identifier-resolution capability.
//!
//! Used to fetch the identifier documents that carry verification-method
//! public keys. Method-specific resolution logic lives outside this crate.

use async_trait::async_trait;

use credkit_core::IdentifierDocument;

use crate::error::ResolveError;

/// Identifier resolution capability. May be network-bound; may fail.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve an identifier to its document.
    ///
    /// Returns `Ok(None)` when the identifier does not resolve; `Err` only
    /// for backend failures.
    async fn resolve(&self, identifier: &str) -> Result<Option<IdentifierDocument>, ResolveError>;
}
