//! Golden canonicalization vectors.
//!
//! Every implementation of the canonical form must turn the input document
//! into exactly these bytes, regardless of key order or platform. Digests
//! are checked for determinism and distinctness rather than pinned, since
//! they are a pure function of the canonical bytes.

use serde_json::Value;

use credkit_core::{canonicalize, digest};

/// A single canonicalization vector.
#[derive(Debug, Clone)]
pub struct CanonicalVector {
    pub name: &'static str,
    pub description: &'static str,
    /// Input document, in deliberately unsorted key order.
    pub document: &'static str,
    /// Expected canonical output.
    pub canonical: &'static str,
}

/// All golden vectors.
pub fn all_vectors() -> Vec<CanonicalVector> {
    vec![
        CanonicalVector {
            name: "empty",
            description: "Empty document has a fixed non-blank form",
            document: "{}",
            canonical: "{}",
        },
        CanonicalVector {
            name: "key_order",
            description: "Keys are sorted regardless of insertion order",
            document: r#"{"b":1,"a":2}"#,
            canonical: r#"{"a":2,"b":1}"#,
        },
        CanonicalVector {
            name: "nested",
            description: "Sorting applies at every level; arrays keep order",
            document: r#"{"z":{"b":[true,false,null]},"a":"x"}"#,
            canonical: r#"{"a":"x","z":{"b":[true,false,null]}}"#,
        },
        CanonicalVector {
            name: "null_preserved",
            description: "Explicit null is preserved, not dropped",
            document: r#"{"present":null,"also":1}"#,
            canonical: r#"{"also":1,"present":null}"#,
        },
        CanonicalVector {
            name: "unicode",
            description: "Unicode text passes through unescaped",
            document: "{\"name\":\"Grüße 世界\"}",
            canonical: "{\"name\":\"Grüße 世界\"}",
        },
        CanonicalVector {
            name: "escapes",
            description: "Quotes, backslashes, and control characters use minimal escapes",
            document: "{\"s\":\"a\\\"b\\\\c\\nd\"}",
            canonical: "{\"s\":\"a\\\"b\\\\c\\nd\"}",
        },
        CanonicalVector {
            name: "numbers",
            description: "One spelling per numeric value",
            document: r#"{"i":42,"n":-7,"f":1.5}"#,
            canonical: r#"{"f":1.5,"i":42,"n":-7}"#,
        },
        CanonicalVector {
            name: "credential_shape",
            description: "A credential-shaped document",
            document: r#"{"type":["VerifiableCredential"],"issuer":"did:test:a","credentialSubject":{"name":"John Doe"}}"#,
            canonical: r#"{"credentialSubject":{"name":"John Doe"},"issuer":"did:test:a","type":["VerifiableCredential"]}"#,
        },
    ]
}

/// Check one vector; returns the actual canonical text on mismatch.
pub fn verify_vector(vector: &CanonicalVector) -> Result<(), String> {
    let document: Value = serde_json::from_str(vector.document)
        .map_err(|e| format!("{}: input does not parse: {e}", vector.name))?;
    let bytes = canonicalize(&document)
        .map_err(|e| format!("{}: canonicalization failed: {e}", vector.name))?;
    let actual = String::from_utf8(bytes)
        .map_err(|e| format!("{}: canonical output is not UTF-8: {e}", vector.name))?;

    if actual == vector.canonical {
        Ok(())
    } else {
        Err(format!(
            "{}: canonical mismatch\n  expected: {}\n  actual:   {}",
            vector.name, vector.canonical, actual
        ))
    }
}

/// Check every vector.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        verify_vector(&vector)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_pass() {
        if let Err(message) = verify_all_vectors() {
            panic!("{message}");
        }
    }

    #[test]
    fn test_digests_deterministic_and_distinct() {
        let mut digests = Vec::new();
        for vector in all_vectors() {
            let document: Value = serde_json::from_str(vector.document).unwrap();
            let d1 = digest(&document).unwrap();
            let d2 = digest(&document).unwrap();
            assert_eq!(d1, d2, "digest must be deterministic for {}", vector.name);
            assert!(d1.starts_with('z'), "multibase base58btc prefix");
            digests.push((vector.name, d1));
        }

        // Distinct inputs (by canonical form) produce distinct digests.
        for (i, (name_a, a)) in digests.iter().enumerate() {
            for (name_b, b) in digests.iter().skip(i + 1) {
                assert_ne!(a, b, "digest collision between {name_a} and {name_b}");
            }
        }
    }

    #[test]
    fn test_vector_inputs_are_unsorted_where_it_matters() {
        // The key_order vector actually exercises reordering.
        let vector = &all_vectors()[1];
        assert_ne!(vector.document, vector.canonical);
    }
}
