//! Verification options: independent toggles for each check.

use std::time::Duration;

/// Which checks to run, and how the degrade conditions behave.
///
/// Each toggle is independent; a disabled check reports `true` in the
/// result regardless of credential content.
#[derive(Debug, Clone)]
pub struct VerificationOptions {
    /// Check the expiration date.
    pub check_expiration: bool,

    /// Check the revocation status reference.
    pub check_revocation: bool,

    /// Validate the subject against the referenced schema.
    pub validate_schema: bool,

    /// Validate blockchain anchor evidence.
    pub verify_blockchain_anchor: bool,

    /// Fail closed on degrade conditions (missing status collaborator,
    /// unparseable expiration, missing schema definition) instead of
    /// passing with a warning.
    pub fail_on_unavailable: bool,

    /// Bound on each collaborator call. A slow collaborator surfaces as a
    /// failure of its own check, never a hang of the whole verification.
    pub collaborator_timeout: Duration,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            check_expiration: true,
            check_revocation: true,
            validate_schema: false,
            verify_blockchain_anchor: false,
            fail_on_unavailable: false,
            collaborator_timeout: Duration::from_secs(10),
        }
    }
}

impl VerificationOptions {
    /// Defaults with every toggle enabled.
    pub fn all_checks() -> Self {
        Self {
            check_expiration: true,
            check_revocation: true,
            validate_schema: true,
            verify_blockchain_anchor: true,
            ..Self::default()
        }
    }
}
