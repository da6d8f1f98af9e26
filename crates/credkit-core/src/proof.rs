//! Proof types attached to credentials.
//!
//! A proof is a tagged variant: either an embedded linked-data signature
//! object or a compact selective-disclosure token. Each variant is produced
//! and checked by its own engine; this module only defines the data shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Identifies which proof engine produced (and can check) a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProofFormat {
    /// Embedded linked-data signature (`proof` object in the JSON document).
    LinkedData,
    /// Compact `header.payload.signature` token with disclosure segments.
    SdToken,
}

impl fmt::Display for ProofFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofFormat::LinkedData => write!(f, "linked-data"),
            ProofFormat::SdToken => write!(f, "sd-token"),
        }
    }
}

impl FromStr for ProofFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linked-data" => Ok(ProofFormat::LinkedData),
            "sd-token" => Ok(ProofFormat::SdToken),
            other => Err(CoreError::InvalidEncoding(format!(
                "unknown proof format: {other}"
            ))),
        }
    }
}

/// The purpose a proof was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims are true.
    AssertionMethod,
    /// Authentication of the credential holder.
    Authentication,
}

impl fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofPurpose::AssertionMethod => write!(f, "assertionMethod"),
            ProofPurpose::Authentication => write!(f, "authentication"),
        }
    }
}

/// An embedded linked-data signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedDataProof {
    /// Signature suite, e.g. `Ed25519Signature2020`.
    #[serde(rename = "type")]
    pub suite: String,

    /// When the proof was created (RFC 3339).
    pub created: String,

    /// Reference to the verification method that can check this proof.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,

    /// Why the proof was created.
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: ProofPurpose,

    /// Multibase-encoded signature bytes.
    #[serde(rename = "proofValue")]
    pub proof_value: String,
}

/// A compact selective-disclosure token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdTokenProof {
    /// Compact `header.payload.signature` token.
    pub token: String,

    /// Per-claim disclosure segments; holders drop entries to hide claims.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disclosures: Vec<String>,
}

/// Cryptographic evidence attached to a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Proof {
    LinkedData(LinkedDataProof),
    SdToken(SdTokenProof),
}

impl Proof {
    /// The format of the engine that understands this proof.
    pub fn format(&self) -> ProofFormat {
        match self {
            Proof::LinkedData(_) => ProofFormat::LinkedData,
            Proof::SdToken(_) => ProofFormat::SdToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_roundtrip() {
        for format in [ProofFormat::LinkedData, ProofFormat::SdToken] {
            let s = format.to_string();
            assert_eq!(s.parse::<ProofFormat>().unwrap(), format);
        }
        assert!("jwt".parse::<ProofFormat>().is_err());
    }

    #[test]
    fn test_linked_data_proof_serializes_w3c_field_names() {
        let proof = Proof::LinkedData(LinkedDataProof {
            suite: "Ed25519Signature2020".to_string(),
            created: "2026-01-15T12:00:00Z".to_string(),
            verification_method: "did:key:z6MkTest#key-1".to_string(),
            proof_purpose: ProofPurpose::AssertionMethod,
            proof_value: "z3FXQ".to_string(),
        });

        let val = serde_json::to_value(&proof).unwrap();
        assert_eq!(val["type"], "Ed25519Signature2020");
        assert_eq!(val["verificationMethod"], "did:key:z6MkTest#key-1");
        assert_eq!(val["proofPurpose"], "assertionMethod");
        assert_eq!(val["proofValue"], "z3FXQ");
        assert!(val.get("suite").is_none());
    }

    #[test]
    fn test_untagged_deserialization_picks_variant() {
        let ld: Proof = serde_json::from_value(serde_json::json!({
            "type": "Ed25519Signature2020",
            "created": "2026-01-15T12:00:00Z",
            "verificationMethod": "did:key:z6MkTest#key-1",
            "proofPurpose": "assertionMethod",
            "proofValue": "zsig"
        }))
        .unwrap();
        assert_eq!(ld.format(), ProofFormat::LinkedData);

        let sd: Proof = serde_json::from_value(serde_json::json!({
            "token": "eyJh.eyJp.c2ln",
            "disclosures": ["WyJz"]
        }))
        .unwrap();
        assert_eq!(sd.format(), ProofFormat::SdToken);
    }
}
