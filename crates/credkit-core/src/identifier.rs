//! Decentralized identifiers and the documents they resolve to.
//!
//! A [`Did`] is the parsed form of a `did:method:specific-id` string. The
//! resolution itself is an external capability; this module only defines the
//! syntax and the [`IdentifierDocument`] shape resolvers return.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::Ed25519PublicKey;
use crate::error::CoreError;

/// A parsed decentralized identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Did {
    method: String,
    method_id: String,
}

impl Did {
    /// Parse a `did:method:specific-id` string.
    ///
    /// The method and the method-specific id must both be non-empty.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let rest = s
            .strip_prefix("did:")
            .ok_or_else(|| CoreError::InvalidIdentifier(format!("missing did scheme: {s}")))?;

        let (method, method_id) = rest
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidIdentifier(format!("missing method id: {s}")))?;

        if method.is_empty() {
            return Err(CoreError::InvalidIdentifier(format!("empty method: {s}")));
        }
        if method_id.is_empty() {
            return Err(CoreError::InvalidIdentifier(format!(
                "empty method-specific id: {s}"
            )));
        }

        Ok(Self {
            method: method.to_string(),
            method_id: method_id.to_string(),
        })
    }

    /// The method name (e.g. `key` in `did:key:z6Mk...`).
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The method-specific id.
    pub fn method_id(&self) -> &str {
        &self.method_id
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}", self.method, self.method_id)
    }
}

/// Strip the fragment from a verification-method reference.
///
/// `did:key:z6Mk...#key-1` refers to a method inside the document resolved
/// from `did:key:z6Mk...`.
pub fn controller_of(method_ref: &str) -> &str {
    match method_ref.split_once('#') {
        Some((did, _)) => did,
        None => method_ref,
    }
}

/// A verification method inside an identifier document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// Full method reference, usually `<did>#<fragment>`.
    pub id: String,

    /// Method type, e.g. `Ed25519VerificationKey2020`.
    #[serde(rename = "type")]
    pub method_type: String,

    /// The identifier that controls this key.
    pub controller: String,

    /// Multibase-encoded public key bytes.
    #[serde(rename = "publicKeyMultibase")]
    pub public_key_multibase: String,
}

impl VerificationMethod {
    /// Decode the embedded public key.
    pub fn public_key(&self) -> Result<Ed25519PublicKey, CoreError> {
        Ed25519PublicKey::from_multibase(&self.public_key_multibase)
    }
}

/// The document an identifier resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierDocument {
    /// The identifier this document describes.
    pub id: String,

    /// Verification methods bound to the identifier.
    #[serde(rename = "verificationMethod", default)]
    pub verification_methods: Vec<VerificationMethod>,
}

impl IdentifierDocument {
    /// Find a verification method by full reference or bare fragment.
    pub fn find_method(&self, reference: &str) -> Option<&VerificationMethod> {
        self.verification_methods.iter().find(|m| {
            m.id == reference
                || reference
                    .split_once('#')
                    .is_some_and(|(_, frag)| m.id.ends_with(&format!("#{frag}")))
        })
    }

    /// The first verification method, if any.
    pub fn default_method(&self) -> Option<&VerificationMethod> {
        self.verification_methods.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    #[test]
    fn test_parse_valid_did() {
        let did = Did::parse("did:key:z6MkTest").unwrap();
        assert_eq!(did.method(), "key");
        assert_eq!(did.method_id(), "z6MkTest");
        assert_eq!(did.to_string(), "did:key:z6MkTest");
    }

    #[test]
    fn test_parse_rejects_missing_scheme() {
        assert!(Did::parse("key:z6MkTest").is_err());
        assert!(Did::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_parts() {
        assert!(Did::parse("did::z6MkTest").is_err());
        assert!(Did::parse("did:key:").is_err());
        assert!(Did::parse("did:key").is_err());
    }

    #[test]
    fn test_controller_of_strips_fragment() {
        assert_eq!(controller_of("did:key:abc#key-1"), "did:key:abc");
        assert_eq!(controller_of("did:key:abc"), "did:key:abc");
    }

    #[test]
    fn test_find_method_by_fragment() {
        let keypair = Keypair::from_seed(&[0x11; 32]);
        let doc = IdentifierDocument {
            id: "did:test:alice".to_string(),
            verification_methods: vec![VerificationMethod {
                id: "did:test:alice#key-1".to_string(),
                method_type: "Ed25519VerificationKey2020".to_string(),
                controller: "did:test:alice".to_string(),
                public_key_multibase: keypair.public_key().to_multibase(),
            }],
        };

        assert!(doc.find_method("did:test:alice#key-1").is_some());
        assert!(doc.find_method("did:test:other#key-1").is_some()); // matching fragment
        assert!(doc.find_method("did:test:alice#key-2").is_none());

        let method = doc.default_method().unwrap();
        assert_eq!(method.public_key().unwrap(), keypair.public_key());
    }
}
