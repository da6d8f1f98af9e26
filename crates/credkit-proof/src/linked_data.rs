//! Linked-data signature engine.
//!
//! Canonicalize the unsigned credential, sign the bytes, embed the
//! multibase signature value as a proof object. Verification recomputes the
//! canonical bytes, resolves the verification method's public key through
//! the external resolver, and checks the Ed25519 signature.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use multibase::Base;
use tracing::debug;

use credkit_core::{
    controller_of, Credential, Ed25519Signature, LinkedDataProof, Proof, ProofFormat,
    ProofPurpose,
};

use crate::engine::{Capabilities, ProofCheck, ProofEngine};
use crate::error::EngineError;
use crate::presentation::{Presentation, PresentationRequest};
use crate::request::IssuanceRequest;
use crate::resolver::Resolver;
use crate::signer::Signer;

/// Signature suite emitted by this engine.
pub const ED25519_SUITE: &str = "Ed25519Signature2020";

/// Proof engine embedding linked-data signatures.
#[derive(Clone, Default)]
pub struct LinkedDataEngine {
    signer: Option<Arc<dyn Signer>>,
    resolver: Option<Arc<dyn Resolver>>,
}

impl LinkedDataEngine {
    /// An engine with no collaborators wired; issue and verify will report
    /// the missing capability.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the signing capability.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Wire the resolution capability.
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

#[async_trait]
impl ProofEngine for LinkedDataEngine {
    fn format(&self) -> ProofFormat {
        ProofFormat::LinkedData
    }

    fn name(&self) -> &'static str {
        "linked-data-signature"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            selective_disclosure: false,
            zero_knowledge: false,
            revocation: true,
            presentation: true,
            predicates: false,
        }
    }

    async fn issue(
        &self,
        credential: &Credential,
        request: &IssuanceRequest,
    ) -> Result<Proof, EngineError> {
        if request.format != self.format() {
            return Err(EngineError::FormatMismatch {
                expected: self.format(),
                requested: request.format,
            });
        }

        let signer = self.signer.as_ref().ok_or(EngineError::NoSignerAvailable)?;

        let message = credential.canonical_bytes()?;
        debug!(key_ref = %request.key_ref, bytes = message.len(), "signing linked-data proof");
        let signature = signer.sign(&message, &request.key_ref).await?;

        Ok(Proof::LinkedData(LinkedDataProof {
            suite: ED25519_SUITE.to_string(),
            created: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            verification_method: request.key_ref.clone(),
            proof_purpose: ProofPurpose::AssertionMethod,
            proof_value: multibase::encode(Base::Base58Btc, signature),
        }))
    }

    async fn verify(&self, credential: &Credential) -> ProofCheck {
        let proof = match &credential.proof {
            Some(proof) => proof,
            None => return ProofCheck::invalid("credential has no proof"),
        };

        let ld = match proof {
            Proof::LinkedData(ld) => ld,
            Proof::SdToken(_) => {
                return ProofCheck::invalid("proof format mismatch: expected linked-data proof")
            }
        };

        if ld.suite.trim().is_empty() {
            return ProofCheck::invalid("proof type is blank");
        }
        if ld.verification_method.trim().is_empty() {
            return ProofCheck::invalid("verification method reference is blank");
        }
        if ld.proof_value.trim().is_empty() {
            return ProofCheck::invalid("proof has no signature value");
        }

        let message = match credential.canonical_bytes() {
            Ok(bytes) => bytes,
            Err(e) => return ProofCheck::invalid(format!("canonicalization failed: {e}")),
        };

        let resolver = match &self.resolver {
            Some(resolver) => resolver,
            None => return ProofCheck::invalid("no resolver available for proof verification"),
        };

        let controller = controller_of(&ld.verification_method);
        let document = match resolver.resolve(controller).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                return ProofCheck::unresolvable(format!(
                    "verification method could not be resolved: {controller}"
                ))
            }
            Err(e) => {
                return ProofCheck::unresolvable(format!(
                    "verification method resolution failed: {e}"
                ))
            }
        };

        let method = match document.find_method(&ld.verification_method) {
            Some(method) => method,
            None => {
                return ProofCheck::unresolvable(format!(
                    "verification method not found in identifier document: {}",
                    ld.verification_method
                ))
            }
        };

        let public_key = match method.public_key() {
            Ok(key) => key,
            Err(e) => return ProofCheck::invalid(format!("malformed verification key: {e}")),
        };

        let signature = match Ed25519Signature::from_multibase(&ld.proof_value) {
            Ok(sig) => sig,
            Err(_) => return ProofCheck::invalid("malformed signature value"),
        };

        match public_key.verify(&message, &signature) {
            Ok(()) => ProofCheck::valid(),
            Err(_) => ProofCheck::invalid("signature verification failed"),
        }
    }

    async fn create_presentation(
        &self,
        credentials: &[Credential],
        request: &PresentationRequest,
    ) -> Result<Presentation, EngineError> {
        if credentials.is_empty() {
            return Err(EngineError::InvalidArgument(
                "credential list is empty".to_string(),
            ));
        }

        // No selective disclosure: credentials are presented whole.
        Ok(Presentation::new(
            credentials.to_vec(),
            request.holder.clone(),
        ))
    }
}
