//! Selective-disclosure token engine.
//!
//! Issues a compact `header.payload.signature` token whose payload carries
//! salted disclosure digests (`_sd`) instead of the claim values. Each claim
//! travels as a separate base64url disclosure segment `[salt, name, value]`;
//! a holder drops segments to hide claims while the token signature stays
//! valid.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use credkit_core::{
    canonicalize, controller_of, Credential, Ed25519Signature, Proof, ProofFormat, SdTokenProof,
};

use crate::engine::{Capabilities, ProofCheck, ProofEngine};
use crate::error::EngineError;
use crate::presentation::{Presentation, PresentationRequest};
use crate::request::IssuanceRequest;
use crate::resolver::Resolver;
use crate::signer::Signer;

const TOKEN_ALG: &str = "EdDSA";
const TOKEN_TYP: &str = "vc+sd";
const SALT_BYTES: usize = 16;

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
    kid: String,
}

/// Proof engine emitting selective-disclosure tokens.
#[derive(Clone, Default)]
pub struct SdTokenEngine {
    signer: Option<Arc<dyn Signer>>,
    resolver: Option<Arc<dyn Resolver>>,
}

impl SdTokenEngine {
    /// An engine with no collaborators wired.
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

fn b64(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

fn b64_json(segment: &str) -> Option<Value> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Build one disclosure segment: `base64url(canonical([salt, name, value]))`.
fn make_disclosure(name: &str, value: &Value) -> Result<String, EngineError> {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);

    let entry = json!([b64(salt), name, value]);
    Ok(b64(canonicalize(&entry)?))
}

/// The digest a disclosure must match inside the token's `_sd` array.
fn disclosure_digest(disclosure: &str) -> String {
    b64(Sha256::digest(disclosure.as_bytes()))
}

/// Decode a disclosure segment back to its claim name and value.
fn decode_disclosure(disclosure: &str) -> Option<(String, Value)> {
    let value = b64_json(disclosure)?;
    let entry = value.as_array()?;
    if entry.len() != 3 {
        return None;
    }
    let name = entry[1].as_str()?.to_string();
    Some((name, entry[2].clone()))
}

#[async_trait]
impl ProofEngine for SdTokenEngine {
    fn format(&self) -> ProofFormat {
        ProofFormat::SdToken
    }

    fn name(&self) -> &'static str {
        "selective-disclosure-token"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            selective_disclosure: true,
            zero_knowledge: false,
            revocation: false,
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

        let mut disclosures = Vec::with_capacity(credential.subject.claims.len());
        let mut digests = Vec::with_capacity(credential.subject.claims.len());
        for (name, value) in &credential.subject.claims {
            let disclosure = make_disclosure(name, value)?;
            digests.push(disclosure_digest(&disclosure));
            disclosures.push(disclosure);
        }
        // Digest order must not leak claim order.
        digests.sort_unstable();

        let header = TokenHeader {
            alg: TOKEN_ALG.to_string(),
            typ: TOKEN_TYP.to_string(),
            kid: request.key_ref.clone(),
        };
        let header_value = serde_json::to_value(&header)
            .map_err(|e| EngineError::InvalidArgument(format!("header serialization: {e}")))?;

        let mut payload = json!({
            "iss": credential.issuer,
            "iat": credential.issuance_date,
            "vc": {"type": credential.types},
            "_sd": digests,
        });
        if let Some(subject_id) = &credential.subject.id {
            payload["sub"] = json!(subject_id);
        }
        if let Some(expiration) = &credential.expiration_date {
            payload["exp"] = json!(expiration);
        }

        let signing_input = format!(
            "{}.{}",
            b64(canonicalize(&header_value)?),
            b64(canonicalize(&payload)?)
        );
        debug!(key_ref = %request.key_ref, claims = disclosures.len(), "signing disclosure token");
        let signature = signer.sign(signing_input.as_bytes(), &request.key_ref).await?;

        Ok(Proof::SdToken(SdTokenProof {
            token: format!("{signing_input}.{}", b64(signature)),
            disclosures,
        }))
    }

    async fn verify(&self, credential: &Credential) -> ProofCheck {
        let proof = match &credential.proof {
            Some(proof) => proof,
            None => return ProofCheck::invalid("credential has no proof"),
        };

        let sd = match proof {
            Proof::SdToken(sd) => sd,
            Proof::LinkedData(_) => {
                return ProofCheck::invalid(
                    "proof format mismatch: expected selective-disclosure token",
                )
            }
        };

        if sd.token.trim().is_empty() {
            return ProofCheck::invalid("proof has no token");
        }

        let parts: Vec<&str> = sd.token.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return ProofCheck::invalid("malformed token");
        }

        let header: TokenHeader = match b64_json(parts[0]).and_then(|v| serde_json::from_value(v).ok())
        {
            Some(header) => header,
            None => return ProofCheck::invalid("malformed token header"),
        };

        if header.alg != TOKEN_ALG {
            return ProofCheck::invalid(format!("unsupported token algorithm: {}", header.alg));
        }
        if header.kid.trim().is_empty() {
            return ProofCheck::invalid("verification method reference is blank");
        }

        let payload = match b64_json(parts[1]) {
            Some(payload) => payload,
            None => return ProofCheck::invalid("malformed token payload"),
        };

        let signature_bytes = match URL_SAFE_NO_PAD.decode(parts[2]) {
            Ok(bytes) => bytes,
            Err(_) => return ProofCheck::invalid("malformed signature value"),
        };
        let signature = match Ed25519Signature::from_slice(&signature_bytes) {
            Ok(sig) => sig,
            Err(_) => return ProofCheck::invalid("malformed signature value"),
        };

        if let Some(iss) = payload.get("iss").and_then(Value::as_str) {
            if iss != credential.issuer {
                return ProofCheck::invalid("token issuer does not match credential issuer");
            }
        }

        let resolver = match &self.resolver {
            Some(resolver) => resolver,
            None => return ProofCheck::invalid("no resolver available for proof verification"),
        };

        let controller = controller_of(&header.kid);
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

        let method = match document.find_method(&header.kid) {
            Some(method) => method,
            None => {
                return ProofCheck::unresolvable(format!(
                    "verification method not found in identifier document: {}",
                    header.kid
                ))
            }
        };

        let public_key = match method.public_key() {
            Ok(key) => key,
            Err(e) => return ProofCheck::invalid(format!("malformed verification key: {e}")),
        };

        let signing_input = format!("{}.{}", parts[0], parts[1]);
        if public_key
            .verify(signing_input.as_bytes(), &signature)
            .is_err()
        {
            return ProofCheck::invalid("signature verification failed");
        }

        // Disclosure integrity: every segment must hash into the signed
        // digest set, and every visible claim must be backed by a segment.
        let digest_set: HashSet<&str> = payload
            .get("_sd")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut disclosed: HashMap<String, Value> = HashMap::new();
        for disclosure in &sd.disclosures {
            if !digest_set.contains(disclosure_digest(disclosure).as_str()) {
                return ProofCheck::invalid("disclosure does not match any token digest");
            }
            match decode_disclosure(disclosure) {
                Some((name, value)) => {
                    disclosed.insert(name, value);
                }
                None => return ProofCheck::invalid("malformed disclosure segment"),
            }
        }

        for (name, value) in &credential.subject.claims {
            if disclosed.get(name) != Some(value) {
                return ProofCheck::invalid(format!("claim not covered by a disclosure: {name}"));
            }
        }

        ProofCheck::valid()
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

        let mut presented = Vec::with_capacity(credentials.len());
        for credential in credentials {
            let mut credential = credential.clone();
            if request.disclose.is_some() {
                if let Some(Proof::SdToken(sd)) = &mut credential.proof {
                    sd.disclosures.retain(|d| {
                        decode_disclosure(d).is_some_and(|(name, _)| request.reveals(&name))
                    });
                }
                credential
                    .subject
                    .claims
                    .retain(|name, _| request.reveals(name));
            }
            presented.push(credential);
        }

        Ok(Presentation::new(presented, request.holder.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignerError;
    use credkit_core::{IdentifierDocument, Keypair, VerificationMethod};

    struct LocalSigner {
        key_ref: String,
        keypair: Keypair,
    }

    #[async_trait]
    impl Signer for LocalSigner {
        async fn sign(&self, payload: &[u8], key_ref: &str) -> Result<Vec<u8>, SignerError> {
            if key_ref != self.key_ref {
                return Err(SignerError::KeyNotFound(key_ref.to_string()));
            }
            Ok(self.keypair.sign(payload).as_bytes().to_vec())
        }
    }

    struct LocalResolver {
        document: IdentifierDocument,
    }

    #[async_trait]
    impl Resolver for LocalResolver {
        async fn resolve(
            &self,
            identifier: &str,
        ) -> Result<Option<IdentifierDocument>, crate::error::ResolveError> {
            if identifier == self.document.id {
                Ok(Some(self.document.clone()))
            } else {
                Ok(None)
            }
        }
    }

    fn wiring() -> (SdTokenEngine, String, String) {
        let keypair = Keypair::from_seed(&[0x55; 32]);
        let issuer = "did:test:issuer".to_string();
        let key_ref = format!("{issuer}#key-1");

        let resolver = LocalResolver {
            document: IdentifierDocument {
                id: issuer.clone(),
                verification_methods: vec![VerificationMethod {
                    id: key_ref.clone(),
                    method_type: "Ed25519VerificationKey2020".to_string(),
                    controller: issuer.clone(),
                    public_key_multibase: keypair.public_key().to_multibase(),
                }],
            },
        };
        let signer = LocalSigner {
            key_ref: key_ref.clone(),
            keypair,
        };

        let engine = SdTokenEngine::new()
            .with_signer(Arc::new(signer))
            .with_resolver(Arc::new(resolver));
        (engine, issuer, key_ref)
    }

    fn unsigned(issuer: &str) -> Credential {
        Credential::builder(issuer)
            .credential_type("PersonCredential")
            .subject_id("did:test:alice")
            .claim("name", "John Doe")
            .claim("age", 29)
            .issuance_date("2026-01-01T00:00:00Z")
            .build()
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let (engine, issuer, key_ref) = wiring();
        let request = IssuanceRequest::new(ProofFormat::SdToken, &issuer, &key_ref);
        let credential = unsigned(&issuer);

        let proof = engine.issue(&credential, &request).await.unwrap();
        match &proof {
            Proof::SdToken(sd) => {
                assert_eq!(sd.token.split('.').count(), 3);
                assert_eq!(sd.disclosures.len(), 2);
            }
            other => panic!("unexpected proof variant: {other:?}"),
        }

        let signed = credential.with_proof(proof);
        let check = engine.verify(&signed).await;
        assert!(check.proof_valid, "errors: {:?}", check.errors);
    }

    #[tokio::test]
    async fn test_tampered_claim_fails() {
        let (engine, issuer, key_ref) = wiring();
        let request = IssuanceRequest::new(ProofFormat::SdToken, &issuer, &key_ref);
        let credential = unsigned(&issuer);

        let proof = engine.issue(&credential, &request).await.unwrap();
        let mut signed = credential.with_proof(proof);
        signed.subject.claims.insert("age".to_string(), 17.into());

        let check = engine.verify(&signed).await;
        assert!(!check.proof_valid);
        assert!(check.errors[0].contains("not covered by a disclosure"));
    }

    #[tokio::test]
    async fn test_foreign_disclosure_rejected() {
        let (engine, issuer, key_ref) = wiring();
        let request = IssuanceRequest::new(ProofFormat::SdToken, &issuer, &key_ref);
        let credential = unsigned(&issuer);

        let proof = engine.issue(&credential, &request).await.unwrap();
        let mut signed = credential.with_proof(proof);
        if let Some(Proof::SdToken(sd)) = &mut signed.proof {
            sd.disclosures
                .push(make_disclosure("admin", &json!(true)).unwrap());
        }

        let check = engine.verify(&signed).await;
        assert!(!check.proof_valid);
        assert!(check.errors[0].contains("does not match any token digest"));
    }

    #[tokio::test]
    async fn test_malformed_token() {
        let (engine, issuer, _) = wiring();
        let mut credential = unsigned(&issuer);
        credential.proof = Some(Proof::SdToken(SdTokenProof {
            token: "only.two".to_string(),
            disclosures: Vec::new(),
        }));

        let check = engine.verify(&credential).await;
        assert!(!check.proof_valid);
        assert!(check.errors[0].contains("malformed token"));
    }

    #[tokio::test]
    async fn test_blank_token() {
        let (engine, issuer, _) = wiring();
        let mut credential = unsigned(&issuer);
        credential.proof = Some(Proof::SdToken(SdTokenProof {
            token: String::new(),
            disclosures: Vec::new(),
        }));

        let check = engine.verify(&credential).await;
        assert!(!check.proof_valid);
        assert!(check.errors[0].contains("no token"));
    }

    #[tokio::test]
    async fn test_selective_presentation_still_verifies() {
        let (engine, issuer, key_ref) = wiring();
        let request = IssuanceRequest::new(ProofFormat::SdToken, &issuer, &key_ref);
        let credential = unsigned(&issuer);
        let proof = engine.issue(&credential, &request).await.unwrap();
        let signed = credential.with_proof(proof);

        let presentation = engine
            .create_presentation(&[signed], &PresentationRequest::disclosing(["name"]))
            .await
            .unwrap();

        let presented = &presentation.credentials[0];
        assert_eq!(presented.subject.claims.len(), 1);
        assert!(presented.subject.claims.contains_key("name"));
        match &presented.proof {
            Some(Proof::SdToken(sd)) => assert_eq!(sd.disclosures.len(), 1),
            other => panic!("unexpected proof: {other:?}"),
        }

        // The reduced credential still carries a valid proof.
        let check = engine.verify(presented).await;
        assert!(check.proof_valid, "errors: {:?}", check.errors);
    }

    #[tokio::test]
    async fn test_disclosure_digest_roundtrip() {
        let disclosure = make_disclosure("name", &json!("John Doe")).unwrap();
        let (name, value) = decode_disclosure(&disclosure).unwrap();
        assert_eq!(name, "name");
        assert_eq!(value, json!("John Doe"));

        // Two disclosures of the same claim differ by salt.
        let other = make_disclosure("name", &json!("John Doe")).unwrap();
        assert_ne!(disclosure, other);
        assert_ne!(disclosure_digest(&disclosure), disclosure_digest(&other));
    }
}
