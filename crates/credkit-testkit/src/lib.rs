//! # credkit-testkit
//!
//! Testing utilities for credkit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a wired issue/verify environment plus in-memory
//!   collaborators (signer, resolver, status list, schema store)
//! - **Generators**: proptest strategies for claim values and credentials
//! - **Vectors**: golden canonicalization cases every implementation of the
//!   canonical form must reproduce byte for byte
//!
//! ## Fixtures
//!
//! Quickly set up a full issue/verify loop with no network or disk:
//!
//! ```rust
//! use credkit::{ProofFormat, VerificationOptions};
//! use credkit_testkit::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! let issued = fixture
//!     .issuer()
//!     .issue(&fixture.person_request(ProofFormat::LinkedData))
//!     .await;
//! let credential = issued.into_result().unwrap();
//!
//! let result = fixture
//!     .verifier()
//!     .verify(&credential, &VerificationOptions::default())
//!     .await;
//! assert!(result.valid);
//! # }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use credkit_testkit::generators::{credential_from_params, CredentialParams};
//!
//! proptest! {
//!     #[test]
//!     fn digest_is_deterministic(params: CredentialParams) {
//!         let credential = credential_from_params(&params);
//!         prop_assert_eq!(credential.digest().unwrap(), credential.digest().unwrap());
//!     }
//! }
//! ```
//!
//! ## Golden Vectors
//!
//! ```rust
//! use credkit_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().expect("canonical form matches the golden vectors");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    multi_issuer_fixtures, FailingResolver, KeystoreSigner, MemoryResolver, MemorySchemaStore,
    MemoryStatusList, NullResolver, StaticAnchorVerifier, TestFixture,
};
pub use generators::{claim_value, claims, credential_from_params, CredentialParams};
pub use vectors::{all_vectors, verify_all_vectors, verify_vector, CanonicalVector};
