//! Test fixtures and in-memory collaborator implementations.
//!
//! Everything here is deterministic when seeded, so tests can wire a full
//! issue/verify loop without network, disk, or real key infrastructure.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use credkit::{Issuer, Verifier};
use credkit_core::{
    Evidence, IdentifierDocument, Keypair, ProofFormat, VerificationMethod,
};
use credkit_proof::{
    EngineRegistry, IssuanceRequest, LinkedDataEngine, ResolveError, Resolver, SdTokenEngine,
    Signer, SignerError,
};
use credkit_verify::{
    AnchorError, AnchorVerifier, SchemaStore, SchemaStoreError, StatusError, StatusList,
};

/// In-memory signer holding raw keypairs, keyed by key reference.
#[derive(Default)]
pub struct KeystoreSigner {
    keys: RwLock<HashMap<String, Keypair>>,
}

impl KeystoreSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signing key under a key reference.
    pub fn insert(&self, key_ref: impl Into<String>, keypair: Keypair) {
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key_ref.into(), keypair);
    }
}

#[async_trait]
impl Signer for KeystoreSigner {
    async fn sign(&self, payload: &[u8], key_ref: &str) -> Result<Vec<u8>, SignerError> {
        let keys = self.keys.read().unwrap_or_else(PoisonError::into_inner);
        let keypair = keys
            .get(key_ref)
            .ok_or_else(|| SignerError::KeyNotFound(key_ref.to_string()))?;
        Ok(keypair.sign(payload).as_bytes().to_vec())
    }
}

/// In-memory resolver over a fixed set of identifier documents.
#[derive(Default)]
pub struct MemoryResolver {
    documents: RwLock<HashMap<String, IdentifierDocument>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resolvable document.
    pub fn insert(&self, document: IdentifierDocument) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document.id.clone(), document);
    }
}

#[async_trait]
impl Resolver for MemoryResolver {
    async fn resolve(&self, identifier: &str) -> Result<Option<IdentifierDocument>, ResolveError> {
        Ok(self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned())
    }
}

/// Resolver that resolves nothing. Stands in for an issuer the relying
/// party cannot reach.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

#[async_trait]
impl Resolver for NullResolver {
    async fn resolve(&self, _identifier: &str) -> Result<Option<IdentifierDocument>, ResolveError> {
        Ok(None)
    }
}

/// Resolver whose backend always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingResolver;

#[async_trait]
impl Resolver for FailingResolver {
    async fn resolve(&self, _identifier: &str) -> Result<Option<IdentifierDocument>, ResolveError> {
        Err(ResolveError::Backend("resolver unavailable".to_string()))
    }
}

/// In-memory status list keyed by status reference id.
#[derive(Default)]
pub struct MemoryStatusList {
    revoked: RwLock<HashSet<String>>,
}

impl MemoryStatusList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a status reference id as revoked.
    pub fn revoke(&self, status_id: impl Into<String>) {
        self.revoked
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(status_id.into());
    }
}

#[async_trait]
impl StatusList for MemoryStatusList {
    async fn is_revoked(
        &self,
        status: &credkit_core::StatusRef,
        _index: Option<u64>,
    ) -> Result<bool, StatusError> {
        Ok(self
            .revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&status.id))
    }
}

/// In-memory schema-definition store.
#[derive(Default)]
pub struct MemorySchemaStore {
    schemas: RwLock<HashMap<String, Value>>,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema definition under its id.
    pub fn insert(&self, schema_id: impl Into<String>, definition: Value) {
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema_id.into(), definition);
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn fetch(&self, schema_id: &str) -> Result<Option<Value>, SchemaStoreError> {
        Ok(self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(schema_id)
            .cloned())
    }
}

/// Anchor verifier with a fixed verdict.
#[derive(Debug, Clone, Copy)]
pub struct StaticAnchorVerifier {
    pub result: bool,
}

#[async_trait]
impl AnchorVerifier for StaticAnchorVerifier {
    async fn verify_anchor(&self, _evidence: &Evidence) -> Result<bool, AnchorError> {
        Ok(self.result)
    }
}

/// A wired issue/verify environment around one issuer identity.
pub struct TestFixture {
    pub keypair: Keypair,
    pub issuer_did: String,
    pub key_ref: String,
    pub signer: Arc<KeystoreSigner>,
    pub resolver: Arc<MemoryResolver>,
}

impl TestFixture {
    /// A fixture with the default deterministic seed.
    pub fn new() -> Self {
        Self::with_seed([0x42; 32])
    }

    /// A fixture with a specific seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        let keypair = Keypair::from_seed(&seed);
        let issuer_did = format!("did:key:{}", keypair.public_key().to_multibase());
        let key_ref = format!("{issuer_did}#key-1");

        let signer = Arc::new(KeystoreSigner::new());
        signer.insert(&key_ref, keypair.clone());

        let resolver = Arc::new(MemoryResolver::new());
        resolver.insert(IdentifierDocument {
            id: issuer_did.clone(),
            verification_methods: vec![VerificationMethod {
                id: key_ref.clone(),
                method_type: "Ed25519VerificationKey2020".to_string(),
                controller: issuer_did.clone(),
                public_key_multibase: keypair.public_key().to_multibase(),
            }],
        });

        Self {
            keypair,
            issuer_did,
            key_ref,
            signer,
            resolver,
        }
    }

    /// A registry with both bundled engines wired to this fixture's signer
    /// and resolver.
    pub fn engines(&self) -> Arc<EngineRegistry> {
        let engines = Arc::new(EngineRegistry::new());
        engines.register(Arc::new(
            LinkedDataEngine::new()
                .with_signer(Arc::clone(&self.signer) as Arc<dyn Signer>)
                .with_resolver(Arc::clone(&self.resolver) as Arc<dyn Resolver>),
        ));
        engines.register(Arc::new(
            SdTokenEngine::new()
                .with_signer(Arc::clone(&self.signer) as Arc<dyn Signer>)
                .with_resolver(Arc::clone(&self.resolver) as Arc<dyn Resolver>),
        ));
        engines
    }

    /// An issuer over this fixture's engines.
    pub fn issuer(&self) -> Issuer {
        Issuer::new(self.engines())
    }

    /// A verifier over this fixture's engines and resolver.
    pub fn verifier(&self) -> Verifier {
        Verifier::new(self.engines(), Arc::clone(&self.resolver) as Arc<dyn Resolver>)
    }

    /// A ready-made person-credential request.
    pub fn person_request(&self, format: ProofFormat) -> IssuanceRequest {
        IssuanceRequest::new(format, &self.issuer_did, &self.key_ref)
            .with_type("PersonCredential")
            .with_subject_id("did:key:z6MkSubject")
            .with_claim("name", "John Doe")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple fixtures with distinct identities.
pub fn multi_issuer_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0xA5;
            TestFixture::with_seed(seed)
        })
        .collect()
}
