//! The credential issuer.
//!
//! Validates an issuance request, builds the unsigned credential, and
//! delegates signing to the engine selected by the request's format id.
//! Validation runs in a fixed order and the first violation wins; no side
//! effects happen before the single signer call inside the engine.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use credkit_core::{Credential, Did, ProofFormat, BASE_CREDENTIAL_TYPE, CREDENTIALS_CONTEXT, MAX_CLAIMS};
use credkit_proof::{EngineError, EngineRegistry, IssuanceRequest, SignerError};

/// Why an issuance request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssuanceFailure {
    #[error("unsupported proof format: {0}")]
    UnsupportedFormat(ProofFormat),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("issuer unresolvable: {0}")]
    IssuerUnresolvable(String),
}

/// The outcome of one issuance call.
#[derive(Debug, Clone)]
pub enum IssuanceResult {
    /// The signed credential.
    Issued(Credential),
    /// A classified rejection.
    Failure(IssuanceFailure),
}

impl IssuanceResult {
    /// Whether a credential was issued.
    pub fn is_issued(&self) -> bool {
        matches!(self, IssuanceResult::Issued(_))
    }

    /// Borrow the credential, if issued.
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            IssuanceResult::Issued(credential) => Some(credential),
            IssuanceResult::Failure(_) => None,
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<Credential, IssuanceFailure> {
        match self {
            IssuanceResult::Issued(credential) => Ok(credential),
            IssuanceResult::Failure(failure) => Err(failure),
        }
    }
}

/// Issues credentials through the engines wired into its registry.
#[derive(Clone)]
pub struct Issuer {
    engines: Arc<EngineRegistry>,
}

impl Issuer {
    /// An issuer over the given engine registry.
    pub fn new(engines: Arc<EngineRegistry>) -> Self {
        Self { engines }
    }

    /// Validate the request and issue a credential.
    ///
    /// Validation order, first violation wins: engine registered for the
    /// format; issuer syntactically valid; issuance timestamp parseable;
    /// claim count within [`MAX_CLAIMS`]; type list non-empty.
    pub async fn issue(&self, request: &IssuanceRequest) -> IssuanceResult {
        debug!(format = %request.format, issuer = %request.issuer, "issuing credential");

        let engine = match self.engines.get(request.format) {
            Some(engine) => engine,
            None => {
                return self.reject(IssuanceFailure::UnsupportedFormat(request.format));
            }
        };

        if request.issuer.trim().is_empty() {
            return self.reject(IssuanceFailure::InvalidRequest(
                "issuer must not be blank".to_string(),
            ));
        }
        if let Err(e) = Did::parse(&request.issuer) {
            return self.reject(IssuanceFailure::InvalidRequest(format!(
                "issuer is not a valid identifier: {e}"
            )));
        }

        let issuance_date = request.effective_issuance_date();
        let issued_at = match DateTime::parse_from_rfc3339(&issuance_date) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                return self.reject(IssuanceFailure::InvalidRequest(format!(
                    "issuance date is not parseable: {e}"
                )));
            }
        };

        if request.subject.claims.len() > MAX_CLAIMS {
            return self.reject(IssuanceFailure::InvalidRequest(format!(
                "subject exceeds maximum claims count ({MAX_CLAIMS})"
            )));
        }

        if request.types.is_empty() {
            return self.reject(IssuanceFailure::InvalidRequest(
                "type list must not be empty".to_string(),
            ));
        }

        let mut types = request.types.clone();
        if !types.iter().any(|t| t == BASE_CREDENTIAL_TYPE) {
            types.insert(0, BASE_CREDENTIAL_TYPE.to_string());
        }

        let id = request
            .id
            .clone()
            .unwrap_or_else(|| format!("urn:uuid:{}", Uuid::new_v4()));

        let expiration_date = request.expiration_date.clone().or_else(|| {
            request
                .valid_for
                .map(|window| (issued_at + window).to_rfc3339_opts(SecondsFormat::Secs, true))
        });

        let credential = Credential {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            id: Some(id),
            types,
            issuer: request.issuer.clone(),
            issuance_date,
            expiration_date,
            subject: request.subject.clone(),
            status: request.status.clone(),
            schema: request.schema.clone(),
            evidence: request.evidence.clone(),
            proof: None,
        };

        match engine.issue(&credential, request).await {
            Ok(proof) => IssuanceResult::Issued(credential.with_proof(proof)),
            Err(e) => self.reject(classify_engine_failure(e)),
        }
    }

    fn reject(&self, failure: IssuanceFailure) -> IssuanceResult {
        warn!(%failure, "issuance rejected");
        IssuanceResult::Failure(failure)
    }
}

/// Map engine errors onto the issuance failure taxonomy.
fn classify_engine_failure(error: EngineError) -> IssuanceFailure {
    match error {
        EngineError::FormatMismatch { requested, .. } => {
            IssuanceFailure::UnsupportedFormat(requested)
        }
        EngineError::NoSignerAvailable => {
            IssuanceFailure::SigningFailed("no signer available".to_string())
        }
        EngineError::Signing(SignerError::KeyNotFound(key_ref)) => {
            IssuanceFailure::IssuerUnresolvable(format!("signing key not found: {key_ref}"))
        }
        EngineError::Signing(e) => IssuanceFailure::SigningFailed(e.to_string()),
        EngineError::InvalidArgument(message) => IssuanceFailure::InvalidRequest(message),
        EngineError::Core(e) => {
            IssuanceFailure::InvalidRequest(format!("credential cannot be encoded: {e}"))
        }
    }
}
