//! # credkit-core
//!
//! Pure primitives for credkit: the credential data model, canonicalization
//! and digests, identifier syntax, and wire codecs.
//!
//! This crate contains no I/O and no collaborator calls. It is pure
//! computation over credential data structures.
//!
//! ## Key Types
//!
//! - [`Credential`] - An immutable, signed claim-set
//! - [`Proof`] - Tagged proof variant (linked-data or selective-disclosure)
//! - [`Did`] - Parsed decentralized identifier
//! - [`IdentifierDocument`] - What an identifier resolves to
//!
//! ## Canonicalization
//!
//! Documents are digested over a deterministic JSON form. See [`canonical`].

pub mod canonical;
pub mod credential;
pub mod crypto;
pub mod encode;
pub mod error;
pub mod identifier;
pub mod proof;

pub use canonical::{canonicalize, canonicalize_with_limit, digest, digest_bytes, MAX_CANONICAL_BYTES};
pub use credential::{
    Credential, CredentialBuilder, Evidence, SchemaRef, StatusRef, Subject, ANCHOR_EVIDENCE_TYPE,
    BASE_CREDENTIAL_TYPE, CREDENTIALS_CONTEXT, MAX_CLAIMS,
};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};
pub use encode::{from_cbor, to_cbor};
pub use error::CoreError;
pub use identifier::{controller_of, Did, IdentifierDocument, VerificationMethod};
pub use proof::{LinkedDataProof, Proof, ProofFormat, ProofPurpose, SdTokenProof};
