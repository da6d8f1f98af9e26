//! The proof engine capability set.
//!
//! Every proof format is a peer implementation of [`ProofEngine`], selected
//! through the format-keyed registry. There is no inheritance between
//! formats; an engine advertises what it can do through [`Capabilities`].
//!
//! # Design Notes
//!
//! - **`verify` never fails**: expected failure modes (missing proof, blank
//!   fields, unresolvable keys, bad signatures) are reported inside
//!   [`ProofCheck`], not as `Err`.
//! - **Side effects only at the boundary**: engines are stateless between
//!   calls; the signer and resolver collaborators own all I/O.

use async_trait::async_trait;

use credkit_core::{Credential, Proof, ProofFormat};

use crate::error::EngineError;
use crate::presentation::{Presentation, PresentationRequest};
use crate::request::IssuanceRequest;

/// What a proof format can do, beyond plain issue/verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Holders can reveal a subset of claims.
    pub selective_disclosure: bool,
    /// Proofs hide the claim values entirely.
    pub zero_knowledge: bool,
    /// The format interoperates with status-list revocation.
    pub revocation: bool,
    /// The format can wrap credentials into presentations.
    pub presentation: bool,
    /// The format supports predicate proofs (over-18 style).
    pub predicates: bool,
}

/// The partial verification result an engine reports.
///
/// The verifier merges this into the full multi-check result: `proof_valid`
/// feeds the proof check; `issuer_valid` is the engine's statement about the
/// verification method's controller (set to `Some(false)` when resolution
/// failed) and is ANDed into the issuer check.
#[derive(Debug, Clone)]
pub struct ProofCheck {
    /// Whether the proof itself held up.
    pub proof_valid: bool,

    /// Engine statement about the key's controller; `None` when the engine
    /// makes no claim either way.
    pub issuer_valid: Option<bool>,

    /// Recorded failures, in the order they were found.
    pub errors: Vec<String>,
}

impl ProofCheck {
    /// A fully passing check.
    pub fn valid() -> Self {
        Self {
            proof_valid: true,
            issuer_valid: None,
            errors: Vec::new(),
        }
    }

    /// A failed proof check.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            proof_valid: false,
            issuer_valid: None,
            errors: vec![error.into()],
        }
    }

    /// A failed check caused by an unresolvable verification method; marks
    /// the issuer side as failed too.
    pub fn unresolvable(error: impl Into<String>) -> Self {
        Self {
            proof_valid: false,
            issuer_valid: Some(false),
            errors: vec![error.into()],
        }
    }
}

/// A pluggable proof format implementation.
#[async_trait]
pub trait ProofEngine: Send + Sync {
    /// The format this engine produces and checks.
    fn format(&self) -> ProofFormat;

    /// Human-readable format name.
    fn name(&self) -> &'static str;

    /// Format version string.
    fn version(&self) -> &'static str;

    /// What the format can do.
    fn capabilities(&self) -> Capabilities;

    /// Produce a proof over the unsigned credential.
    ///
    /// Fails with `FormatMismatch` when the request names another format,
    /// `NoSignerAvailable` when the engine was wired without a signer, and
    /// propagates signer failures.
    async fn issue(
        &self,
        credential: &Credential,
        request: &IssuanceRequest,
    ) -> Result<Proof, EngineError>;

    /// Check the credential's proof. Never returns `Err` for expected
    /// failure modes; see [`ProofCheck`].
    async fn verify(&self, credential: &Credential) -> ProofCheck;

    /// Wrap credentials into a presentation, filtering disclosed claims
    /// when the format supports selective disclosure.
    async fn create_presentation(
        &self,
        credentials: &[Credential],
        request: &PresentationRequest,
    ) -> Result<Presentation, EngineError>;
}
