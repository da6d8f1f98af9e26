//! # credkit
//!
//! A verifiable-credential engine: signed claim-sets whose authenticity,
//! currency, and integrity can be checked independently of the issuer.
//!
//! ## Overview
//!
//! - **Proof formats are pluggable**: each format is a peer implementation
//!   of the `ProofEngine` capability set, selected through a format-keyed
//!   registry. Linked-data signatures and selective-disclosure tokens ship
//!   in the box.
//! - **Issuance** validates the request, builds the unsigned credential,
//!   and delegates signing to the selected engine.
//! - **Verification** composes six independent, toggle-able checks (proof,
//!   issuer, expiration, revocation, schema, anchor) into one result, each
//!   check isolated from the others' failures.
//! - **External collaborators** (signer, resolver, status list, anchor
//!   lookup, schema store) are async traits; wire whichever backends your
//!   deployment has.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use credkit::{
//!     EngineRegistry, Issuer, IssuanceRequest, LinkedDataEngine, ProofFormat,
//!     VerificationOptions, Verifier,
//! };
//! # use credkit::{Resolver, Signer};
//!
//! async fn example(signer: Arc<dyn Signer>, resolver: Arc<dyn Resolver>) {
//!     let engines = Arc::new(EngineRegistry::new());
//!     engines.register(Arc::new(
//!         LinkedDataEngine::new()
//!             .with_signer(signer)
//!             .with_resolver(Arc::clone(&resolver)),
//!     ));
//!
//!     let issuer = Issuer::new(Arc::clone(&engines));
//!     let request = IssuanceRequest::new(
//!         ProofFormat::LinkedData,
//!         "did:example:issuer",
//!         "did:example:issuer#key-1",
//!     )
//!     .with_type("PersonCredential")
//!     .with_claim("name", "John Doe");
//!
//!     let credential = issuer.issue(&request).await.into_result().unwrap();
//!
//!     let verifier = Verifier::new(engines, resolver);
//!     let result = verifier
//!         .verify(&credential, &VerificationOptions::default())
//!         .await;
//!     assert!(result.valid);
//! }
//! ```
//!
//! ## Re-exports
//!
//! The component crates are re-exported for convenience:
//!
//! - `credkit::core` - data model, canonicalization, digests, codecs
//! - `credkit::proof` - engines, registry, signer/resolver capabilities
//! - `credkit::schema` - schema validator registry and auto-detection
//! - `credkit::verify` - the multi-check verifier

pub mod issuer;

// Re-export component crates
pub use credkit_core as core;
pub use credkit_proof as proof;
pub use credkit_schema as schema;
pub use credkit_verify as verify;

// Re-export main types for convenience
pub use issuer::{IssuanceFailure, IssuanceResult, Issuer};

pub use credkit_core::{
    canonicalize, digest, from_cbor, to_cbor, Credential, CredentialBuilder, Did, Evidence,
    IdentifierDocument, Keypair, LinkedDataProof, Proof, ProofFormat, SchemaRef, StatusRef,
    Subject, VerificationMethod, BASE_CREDENTIAL_TYPE, MAX_CLAIMS,
};
pub use credkit_proof::{
    Capabilities, EngineRegistry, IssuanceRequest, LinkedDataEngine, Presentation,
    PresentationRequest, ProofCheck, ProofEngine, Resolver, SdTokenEngine, Signer,
};
pub use credkit_schema::{
    detect_schema_format, JsonSchemaValidator, SchemaFormat, SchemaRegistry, SchemaValidator,
};
pub use credkit_verify::{
    AnchorVerifier, SchemaStore, StatusList, VerificationError, VerificationOptions,
    VerificationOutcome, VerificationResult, Verifier,
};
