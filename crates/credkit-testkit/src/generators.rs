//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::Value;

use credkit_core::Credential;

/// Generate an arbitrary JSON claim value: null, bool, number, string
/// (including unicode), or a nested array/object up to depth 3.
pub fn claim_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        prop::num::f64::NORMAL.prop_map(|f| {
            serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        }),
        any::<String>().prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z][a-z0-9_]{0,11}", inner, 0..4).prop_map(|map| {
                Value::Object(map.into_iter().collect())
            }),
        ]
    })
}

/// Generate a claim name. `id` is excluded: that key belongs to the
/// subject identifier, not the claim map.
pub fn claim_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,15}"
        .prop_map(String::from)
        .prop_filter("the id key is reserved for the subject identifier", |s| {
            s != "id"
        })
}

/// Generate a claim map.
pub fn claims(max: usize) -> impl Strategy<Value = BTreeMap<String, Value>> {
    prop::collection::btree_map(claim_name(), claim_value(), 0..=max)
}

/// Parameters for generating an unsigned credential.
#[derive(Debug, Clone)]
pub struct CredentialParams {
    pub issuer_tag: String,
    pub extra_type: Option<String>,
    pub subject_id: Option<String>,
    pub claims: BTreeMap<String, Value>,
    pub expiration_date: Option<String>,
}

impl Arbitrary for CredentialParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            "[a-z][a-z0-9]{2,11}",
            prop::option::of("[A-Z][a-zA-Z]{2,15}Credential"),
            prop::option::of("[a-z][a-z0-9]{2,11}"),
            claims(6),
            prop::option::of(Just("2090-01-01T00:00:00Z".to_string())),
        )
            .prop_map(|(issuer_tag, extra_type, subject_id, claims, expiration_date)| {
                CredentialParams {
                    issuer_tag,
                    extra_type,
                    subject_id: subject_id.map(|s| format!("did:test:{s}")),
                    claims,
                    expiration_date,
                }
            })
            .boxed()
    }
}

/// Build an unsigned credential from parameters.
pub fn credential_from_params(params: &CredentialParams) -> Credential {
    let mut builder = Credential::builder(format!("did:test:{}", params.issuer_tag))
        .issuance_date("2026-01-01T00:00:00Z");

    if let Some(extra) = &params.extra_type {
        builder = builder.credential_type(extra.clone());
    }
    if let Some(subject_id) = &params.subject_id {
        builder = builder.subject_id(subject_id.clone());
    }
    for (name, value) in &params.claims {
        builder = builder.claim(name.clone(), value.clone());
    }
    if let Some(expiration) = &params.expiration_date {
        builder = builder.expiration_date(expiration.clone());
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use credkit_core::{canonicalize, from_cbor, to_cbor};

    proptest! {
        #[test]
        fn test_canonical_bytes_deterministic(params: CredentialParams) {
            let c1 = credential_from_params(&params);
            let c2 = credential_from_params(&params);

            let v1 = c1.unsigned_value().unwrap();
            let v2 = c2.unsigned_value().unwrap();
            prop_assert_eq!(canonicalize(&v1).unwrap(), canonicalize(&v2).unwrap());
        }

        #[test]
        fn test_digest_deterministic(params: CredentialParams) {
            let credential = credential_from_params(&params);
            prop_assert_eq!(credential.digest().unwrap(), credential.digest().unwrap());
        }

        #[test]
        fn test_cbor_roundtrip(params: CredentialParams) {
            let credential = credential_from_params(&params);
            let decoded = from_cbor(&to_cbor(&credential).unwrap()).unwrap();

            prop_assert_eq!(&decoded.types, &credential.types);
            prop_assert_eq!(&decoded.issuer, &credential.issuer);
            prop_assert_eq!(&decoded.subject.id, &credential.subject.id);
            prop_assert_eq!(&decoded.subject.claims, &credential.subject.claims);
            prop_assert_eq!(decoded, credential);
        }

        #[test]
        fn test_json_roundtrip(params: CredentialParams) {
            let credential = credential_from_params(&params);
            let text = serde_json::to_string(&credential).unwrap();
            let decoded: Credential = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(decoded, credential);
        }
    }
}
