//! # credkit-verify
//!
//! The multi-check credential verifier.
//!
//! [`Verifier::verify`] composes six independent, toggle-able checks —
//! proof, issuer, expiration, revocation, schema, anchor — into one
//! [`VerificationResult`]. Checks run concurrently, isolate their own
//! collaborator failures, and are all reported even when an earlier one
//! fails. Batch verification runs behind a bounded worker pool.
//!
//! Optional collaborators ([`StatusList`], [`AnchorVerifier`],
//! [`SchemaStore`]) degrade their check to a pass-with-warning when absent;
//! `fail_on_unavailable` flips those same conditions to hard errors.

pub mod anchor;
pub mod options;
pub mod result;
pub mod schema_store;
pub mod status;
pub mod verifier;

pub use anchor::{AnchorError, AnchorVerifier};
pub use options::VerificationOptions;
pub use result::{VerificationError, VerificationOutcome, VerificationResult};
pub use schema_store::{SchemaStore, SchemaStoreError};
pub use status::{StatusError, StatusList};
pub use verifier::{Verifier, DEFAULT_BATCH_CONCURRENCY};
