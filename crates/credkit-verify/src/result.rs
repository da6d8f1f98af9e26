//! Verification results: per-check fields plus typed failures.

use thiserror::Error;

/// A typed verification failure. `Display` renders the human-readable
/// message carried by each variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    #[error("invalid issuer: {0}")]
    InvalidIssuer(String),

    #[error("credential expired: {0}")]
    Expired(String),

    #[error("credential not yet valid: {0}")]
    NotYetValid(String),

    #[error("credential revoked: {0}")]
    Revoked(String),

    #[error("unsupported proof format: {0}")]
    UnsupportedFormat(String),

    #[error("untrusted issuer: {0}")]
    UntrustedIssuer(String),

    #[error("schema validation failed: {0}")]
    SchemaValidationFailed(String),

    #[error("invalid blockchain anchor: {0}")]
    InvalidAnchor(String),

    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

/// Condensed outcome over the whole result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Every enabled check passed.
    Valid,
    /// Exactly one failure.
    Invalid(VerificationError),
    /// More than one failure.
    MultipleFailures(Vec<VerificationError>),
}

/// The aggregate result of one verification run.
///
/// Every enabled check is reported, even after an earlier check failed;
/// `valid` is the AND over all checks whose option was enabled. Disabled
/// checks hold `true`. `errors` drive `valid`; `warnings` never do.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub proof_valid: bool,
    pub issuer_valid: bool,
    pub not_expired: bool,
    pub not_revoked: bool,
    pub schema_valid: bool,
    pub blockchain_anchor_valid: bool,

    /// AND over all enabled checks.
    pub valid: bool,

    /// Failures, ordered proof, issuer, expiration, revocation, schema,
    /// anchor.
    pub errors: Vec<VerificationError>,

    /// Non-fatal observations, same ordering.
    pub warnings: Vec<String>,
}

impl VerificationResult {
    /// Condense the error list into a single outcome value.
    pub fn outcome(&self) -> VerificationOutcome {
        if self.valid {
            return VerificationOutcome::Valid;
        }
        match self.errors.as_slice() {
            [] => VerificationOutcome::MultipleFailures(Vec::new()),
            [single] => VerificationOutcome::Invalid(single.clone()),
            many => VerificationOutcome::MultipleFailures(many.to_vec()),
        }
    }
}
