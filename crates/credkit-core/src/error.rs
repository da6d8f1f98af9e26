//! Error types for credkit core primitives.

use thiserror::Error;

/// Errors from canonicalization, codecs, and key handling.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("canonical output exceeds size limit: {actual} bytes (limit {limit})")]
    SizeExceeded { limit: usize, actual: usize },

    #[error("value cannot be canonicalized: {0}")]
    UnsupportedValue(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
