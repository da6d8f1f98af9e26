//! End-to-end issue/verify scenarios over the wired engine stack.
//!
//! These tests exercise the full loop — request validation, engine signing,
//! the six-check verifier — through the public facade, with the in-memory
//! collaborators from the testkit standing in for real backends.

use std::sync::Arc;

use serde_json::json;

use credkit::{
    from_cbor, to_cbor, ProofEngine, ProofFormat, SchemaRef, StatusRef, VerificationOptions,
    Verifier,
};
use credkit_testkit::{
    FailingResolver, MemorySchemaStore, MemoryStatusList, NullResolver, TestFixture,
};

fn person_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"}
        }
    })
}

#[tokio::test]
async fn issue_then_verify_linked_data() {
    let fixture = TestFixture::new();

    let issued = fixture
        .issuer()
        .issue(&fixture.person_request(ProofFormat::LinkedData))
        .await;
    let credential = issued.into_result().expect("issuance should succeed");

    assert!(credential.proof.is_some());
    assert_eq!(
        credential.types,
        vec!["VerifiableCredential", "PersonCredential"]
    );
    // No id in the request, so one was generated.
    assert!(credential.id.as_deref().unwrap().starts_with("urn:uuid:"));

    let result = fixture
        .verifier()
        .verify(&credential, &VerificationOptions::default())
        .await;

    assert!(result.proof_valid);
    assert!(result.issuer_valid);
    assert!(result.not_expired);
    assert!(result.not_revoked);
    assert!(result.schema_valid);
    assert!(result.blockchain_anchor_valid);
    assert!(result.valid, "errors: {:?}", result.errors);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn issue_then_verify_sd_token() {
    let fixture = TestFixture::new();

    let request = fixture
        .person_request(ProofFormat::SdToken)
        .with_claim("age", 29);
    let credential = fixture
        .issuer()
        .issue(&request)
        .await
        .into_result()
        .expect("issuance should succeed");

    let result = fixture
        .verifier()
        .verify(&credential, &VerificationOptions::default())
        .await;
    assert!(result.valid, "errors: {:?}", result.errors);
}

#[tokio::test]
async fn expired_credential_reports_expired() {
    let fixture = TestFixture::new();

    let request = fixture
        .person_request(ProofFormat::LinkedData)
        .with_expiration_date("2020-01-01T00:00:00Z");
    let credential = fixture
        .issuer()
        .issue(&request)
        .await
        .into_result()
        .expect("issuance should succeed");

    let result = fixture
        .verifier()
        .verify(&credential, &VerificationOptions::default())
        .await;

    assert!(!result.not_expired);
    assert!(!result.valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.to_string().contains("expired")));
    // The proof check still ran and passed.
    assert!(result.proof_valid);
}

#[tokio::test]
async fn missing_proof_is_always_fatal() {
    let fixture = TestFixture::new();
    let credential = fixture
        .issuer()
        .issue(&fixture.person_request(ProofFormat::LinkedData))
        .await
        .into_result()
        .expect("issuance should succeed");

    let mut stripped = credential;
    stripped.proof = None;

    // Even with every optional check disabled, an absent proof fails.
    let options = VerificationOptions {
        check_expiration: false,
        check_revocation: false,
        ..VerificationOptions::default()
    };
    let result = fixture.verifier().verify(&stripped, &options).await;

    assert!(!result.proof_valid);
    assert!(!result.valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.to_string().contains("no proof")));
}

#[tokio::test]
async fn disabling_a_check_forces_its_field_true() {
    let fixture = TestFixture::new();

    // Expired credential with a status reference nobody can check.
    let request = fixture
        .person_request(ProofFormat::LinkedData)
        .with_expiration_date("2020-01-01T00:00:00Z")
        .with_status(StatusRef {
            id: "https://status.example/list/1".to_string(),
            status_type: "StatusList2021Entry".to_string(),
            index: Some(7),
        });
    let credential = fixture
        .issuer()
        .issue(&request)
        .await
        .into_result()
        .expect("issuance should succeed");

    let status_list = Arc::new(MemoryStatusList::new());
    status_list.revoke("https://status.example/list/1");

    let verifier = fixture.verifier().with_status_list(status_list);

    // Both enabled: both fail.
    let result = verifier
        .verify(&credential, &VerificationOptions::default())
        .await;
    assert!(!result.not_expired);
    assert!(!result.not_revoked);

    // Expiration disabled: its field is true regardless of content.
    let options = VerificationOptions {
        check_expiration: false,
        ..VerificationOptions::default()
    };
    let result = verifier.verify(&credential, &options).await;
    assert!(result.not_expired);
    assert!(!result.not_revoked);

    // Revocation disabled too: only the revocation verdict changes.
    let options = VerificationOptions {
        check_expiration: false,
        check_revocation: false,
        ..VerificationOptions::default()
    };
    let result = verifier.verify(&credential, &options).await;
    assert!(result.not_expired);
    assert!(result.not_revoked);
    assert!(result.valid, "errors: {:?}", result.errors);
}

#[tokio::test]
async fn unresolvable_issuer_fails_verification() {
    let fixture = TestFixture::new();
    let credential = fixture
        .issuer()
        .issue(&fixture.person_request(ProofFormat::LinkedData))
        .await
        .into_result()
        .expect("issuance should succeed");

    // Same engines, but a verifier whose resolver resolves nothing.
    let verifier = Verifier::new(fixture.engines(), Arc::new(NullResolver));
    let result = verifier
        .verify(&credential, &VerificationOptions::default())
        .await;

    assert!(!result.issuer_valid);
    assert!(!result.valid);
}

#[tokio::test]
async fn resolver_backend_failure_is_recorded_not_thrown() {
    let fixture = TestFixture::new();
    let credential = fixture
        .issuer()
        .issue(&fixture.person_request(ProofFormat::LinkedData))
        .await
        .into_result()
        .expect("issuance should succeed");

    let verifier = Verifier::new(fixture.engines(), Arc::new(FailingResolver));
    let result = verifier
        .verify(&credential, &VerificationOptions::default())
        .await;

    assert!(!result.issuer_valid);
    assert!(!result.valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.to_string().contains("resolution failed")));
}

#[tokio::test]
async fn registered_schema_validator_passes_conforming_subject() {
    let fixture = TestFixture::new();

    let request = fixture
        .person_request(ProofFormat::LinkedData)
        .with_schema(SchemaRef {
            id: "https://schemas.example/person".to_string(),
            schema_type: None,
        });
    let credential = fixture
        .issuer()
        .issue(&request)
        .await
        .into_result()
        .expect("issuance should succeed");

    let store = Arc::new(MemorySchemaStore::new());
    store.insert("https://schemas.example/person", person_schema());

    let verifier = fixture.verifier().with_schema_store(store);
    let options = VerificationOptions {
        validate_schema: true,
        ..VerificationOptions::default()
    };
    let result = verifier.verify(&credential, &options).await;

    assert!(result.schema_valid, "errors: {:?}", result.errors);
    assert!(result.valid);
}

#[tokio::test]
async fn revoked_credential_fails_with_collaborator_wired() {
    let fixture = TestFixture::new();

    let request = fixture
        .person_request(ProofFormat::LinkedData)
        .with_status(StatusRef {
            id: "https://status.example/list/1".to_string(),
            status_type: "StatusList2021Entry".to_string(),
            index: Some(42),
        });
    let credential = fixture
        .issuer()
        .issue(&request)
        .await
        .into_result()
        .expect("issuance should succeed");

    let status_list = Arc::new(MemoryStatusList::new());

    // Not revoked yet.
    let verifier = fixture
        .verifier()
        .with_status_list(Arc::clone(&status_list) as _);
    let result = verifier
        .verify(&credential, &VerificationOptions::default())
        .await;
    assert!(result.not_revoked);
    assert!(result.valid, "errors: {:?}", result.errors);

    // Revoke and check again.
    status_list.revoke("https://status.example/list/1");
    let result = verifier
        .verify(&credential, &VerificationOptions::default())
        .await;
    assert!(!result.not_revoked);
    assert!(!result.valid);
}

#[tokio::test]
async fn signed_credential_survives_binary_roundtrip() {
    let fixture = TestFixture::new();

    let request = fixture
        .person_request(ProofFormat::LinkedData)
        .with_claim("age", 29)
        .with_claim("active", true)
        .with_claim("middleName", json!(null))
        .with_claim("address", json!({"city": "Zürich"}))
        .with_claim("tags", json!(["a", "b", 3]));
    let credential = fixture
        .issuer()
        .issue(&request)
        .await
        .into_result()
        .expect("issuance should succeed");

    let decoded = from_cbor(&to_cbor(&credential).unwrap()).unwrap();
    assert_eq!(decoded, credential);

    // The decoded copy still verifies: the proof covers the same canonical
    // bytes on both sides of the wire.
    let result = fixture
        .verifier()
        .verify(&decoded, &VerificationOptions::default())
        .await;
    assert!(result.valid, "errors: {:?}", result.errors);
}

#[tokio::test]
async fn selective_disclosure_presentation_verifies() {
    let fixture = TestFixture::new();

    let request = fixture
        .person_request(ProofFormat::SdToken)
        .with_claim("age", 29)
        .with_claim("email", "john@example.com");
    let credential = fixture
        .issuer()
        .issue(&request)
        .await
        .into_result()
        .expect("issuance should succeed");

    let engine = fixture
        .engines()
        .get(ProofFormat::SdToken)
        .expect("engine registered");
    let presentation = engine
        .create_presentation(
            std::slice::from_ref(&credential),
            &credkit::PresentationRequest::disclosing(["name"]),
        )
        .await
        .unwrap();

    let presented = &presentation.credentials[0];
    assert_eq!(presented.subject.claims.len(), 1);
    assert!(presented.subject.claims.contains_key("name"));

    // The reduced credential still passes full verification.
    let result = fixture
        .verifier()
        .verify(presented, &VerificationOptions::default())
        .await;
    assert!(result.valid, "errors: {:?}", result.errors);
}

#[tokio::test]
async fn batch_verification_is_independent_per_item() {
    let fixture = TestFixture::new();
    let issuer = fixture.issuer();

    let good = issuer
        .issue(&fixture.person_request(ProofFormat::LinkedData))
        .await
        .into_result()
        .expect("issuance should succeed");
    let expired = issuer
        .issue(
            &fixture
                .person_request(ProofFormat::LinkedData)
                .with_expiration_date("2020-01-01T00:00:00Z"),
        )
        .await
        .into_result()
        .expect("issuance should succeed");
    let mut proofless = good.clone();
    proofless.proof = None;

    let results = fixture
        .verifier()
        .verify_all(
            &[good, expired, proofless],
            &VerificationOptions::default(),
        )
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].valid);
    assert!(!results[1].valid);
    assert!(results[1].proof_valid, "no cross-item contamination");
    assert!(!results[2].proof_valid);
    assert!(results[2].not_expired, "no cross-item contamination");
}
