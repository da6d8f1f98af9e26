//! Binary wire codec for credentials.
//!
//! CBOR encoding that round-trips losslessly against the JSON model for
//! every claim value kind: strings, numbers, booleans, nested objects,
//! arrays, unicode, and explicit null.

use crate::credential::Credential;
use crate::error::CoreError;

/// Encode a credential to CBOR bytes.
pub fn to_cbor(credential: &Credential) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(credential, &mut buf)
        .map_err(|e| CoreError::InvalidEncoding(format!("failed to encode CBOR: {e}")))?;
    Ok(buf)
}

/// Decode a credential from CBOR bytes.
///
/// Malformed input fails with `InvalidEncoding`.
pub fn from_cbor(bytes: &[u8]) -> Result<Credential, CoreError> {
    ciborium::from_reader(bytes)
        .map_err(|e| CoreError::InvalidEncoding(format!("failed to parse CBOR: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{Credential, StatusRef};
    use serde_json::json;

    fn sample() -> Credential {
        Credential::builder("did:test:issuer")
            .id("urn:uuid:b3c192aa-27c9-4c39-bd9e-3f8d63f0ee21")
            .credential_type("PersonCredential")
            .subject_id("did:test:alice")
            .claim("name", "Grüße 世界")
            .claim("age", 42)
            .claim("score", 99.25)
            .claim("active", true)
            .claim("middleName", json!(null))
            .claim("address", json!({"city": "Zürich", "zip": "8001"}))
            .claim("tags", json!(["a", "b", 3]))
            .issuance_date("2026-01-01T00:00:00Z")
            .status(StatusRef {
                id: "https://status.example/list/1".to_string(),
                status_type: "StatusList2021Entry".to_string(),
                index: Some(94567),
            })
            .build()
    }

    #[test]
    fn test_roundtrip_preserves_everything() {
        let cred = sample();
        let bytes = to_cbor(&cred).unwrap();
        let back = from_cbor(&bytes).unwrap();
        assert_eq!(cred, back);
    }

    #[test]
    fn test_roundtrip_preserves_claim_kinds() {
        let cred = sample();
        let back = from_cbor(&to_cbor(&cred).unwrap()).unwrap();

        assert_eq!(back.types, cred.types);
        assert_eq!(back.issuer, cred.issuer);
        assert_eq!(back.subject.id, cred.subject.id);
        assert_eq!(back.subject.claims["name"], json!("Grüße 世界"));
        assert_eq!(back.subject.claims["age"], json!(42));
        assert_eq!(back.subject.claims["active"], json!(true));
        assert_eq!(back.subject.claims["middleName"], json!(null));
        assert_eq!(back.subject.claims["address"]["city"], json!("Zürich"));
        assert_eq!(back.subject.claims["tags"], json!(["a", "b", 3]));
    }

    #[test]
    fn test_malformed_input_fails_to_parse() {
        let err = from_cbor(&[0xff, 0x00, 0x13]).unwrap_err();
        match err {
            CoreError::InvalidEncoding(msg) => assert!(msg.contains("failed to parse")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_input_fails_to_parse() {
        let bytes = to_cbor(&sample()).unwrap();
        assert!(from_cbor(&bytes[..bytes.len() / 2]).is_err());
    }

    #[test]
    fn test_empty_input_fails_to_parse() {
        assert!(from_cbor(&[]).is_err());
    }
}
