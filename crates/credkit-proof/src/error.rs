//! Error types for proof engines and their collaborators.

use thiserror::Error;

use credkit_core::{CoreError, ProofFormat};

/// Failures from the external signing capability.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("signing key not found: {0}")]
    KeyNotFound(String),

    #[error("signing backend failure: {0}")]
    Backend(String),
}

/// Failures from the external identifier-resolution capability.
///
/// "Identifier not found" is not an error; resolvers report it as
/// `Ok(None)`.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported identifier method: {0}")]
    UnsupportedMethod(String),

    #[error("resolver backend failure: {0}")]
    Backend(String),
}

/// Errors from proof engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("format mismatch: engine handles {expected}, request asks for {requested}")]
    FormatMismatch {
        expected: ProofFormat,
        requested: ProofFormat,
    },

    #[error("no signer available")]
    NoSignerAvailable,

    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
