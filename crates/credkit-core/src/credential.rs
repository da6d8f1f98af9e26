//! The credential: an immutable, signed claim-set.
//!
//! A credential is never edited once a proof is attached. Attaching a proof
//! produces a new value; the content digest is computed over the canonical
//! form with the proof excluded, so it is stable across signing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::canonical;
use crate::error::CoreError;
use crate::proof::Proof;

/// The marker type every credential must carry.
pub const BASE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// The JSON-LD context emitted on the wire form.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Maximum number of subject claims accepted at issuance.
pub const MAX_CLAIMS: usize = 1000;

/// Evidence type marking a blockchain anchor entry.
pub const ANCHOR_EVIDENCE_TYPE: &str = "BlockchainAnchor";

/// The subject of a credential: an optional identifier plus a claim map.
///
/// Claims live in a `BTreeMap` so keys are unique and iteration order is
/// stable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subject {
    /// Identifier of the entity the claims are about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The claims themselves.
    #[serde(flatten)]
    pub claims: BTreeMap<String, Value>,
}

impl Subject {
    /// A subject with claims and no identifier.
    pub fn from_claims(claims: BTreeMap<String, Value>) -> Self {
        Self { id: None, claims }
    }
}

/// Reference to an external revocation index entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRef {
    /// Location of the status list.
    pub id: String,

    /// Status mechanism type, e.g. `StatusList2021Entry`.
    #[serde(rename = "type")]
    pub status_type: String,

    /// Index of this credential inside the list.
    #[serde(
        rename = "statusListIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub index: Option<u64>,
}

/// Reference to the schema a credential claims conformance with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    /// Identifier of the schema definition.
    pub id: String,

    /// Schema mechanism type, e.g. `JsonSchema`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
}

/// An evidence entry. Anchor evidence carries the chain id and transaction
/// reference checked by the anchor collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Evidence types, e.g. `["BlockchainAnchor"]`.
    #[serde(rename = "type")]
    pub kinds: Vec<String>,

    /// Evidence properties.
    #[serde(flatten)]
    pub properties: BTreeMap<String, Value>,
}

impl Evidence {
    /// Build a blockchain-anchor evidence entry.
    pub fn anchor(chain_id: impl Into<String>, transaction: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("chainId".to_string(), Value::String(chain_id.into()));
        properties.insert(
            "transactionHash".to_string(),
            Value::String(transaction.into()),
        );
        Self {
            kinds: vec![ANCHOR_EVIDENCE_TYPE.to_string()],
            properties,
        }
    }

    /// Whether this entry is a blockchain anchor.
    pub fn is_anchor(&self) -> bool {
        self.kinds.iter().any(|k| k == ANCHOR_EVIDENCE_TYPE)
    }

    /// A named string property, trimmed; `None` when absent or blank.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A verifiable credential.
///
/// Dates are carried as RFC 3339 strings and parsed where they are used, so
/// documents ingested from the wire with malformed dates still reach the
/// verifier, which decides how to report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential identifier (URI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Ordered type list. Must include [`BASE_CREDENTIAL_TYPE`].
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Issuer identifier (DID or IRI).
    pub issuer: String,

    /// When the credential was issued (RFC 3339).
    #[serde(rename = "issuanceDate")]
    pub issuance_date: String,

    /// Optional expiration (RFC 3339).
    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<String>,

    /// The subject and its claims.
    #[serde(rename = "credentialSubject")]
    pub subject: Subject,

    /// Optional revocation status reference.
    #[serde(
        rename = "credentialStatus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<StatusRef>,

    /// Optional schema reference.
    #[serde(
        rename = "credentialSchema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub schema: Option<SchemaRef>,

    /// Evidence entries (anchors and otherwise).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,

    /// Attached proof, if the credential has been signed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl Credential {
    /// Start building an unsigned credential.
    pub fn builder(issuer: impl Into<String>) -> CredentialBuilder {
        CredentialBuilder::new(issuer)
    }

    /// The document without its proof, as a JSON value. This is the input
    /// to canonicalization, signing, and digesting.
    pub fn unsigned_value(&self) -> Result<Value, CoreError> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| CoreError::InvalidEncoding(format!("failed to serialize: {e}")))?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("proof");
        }
        Ok(value)
    }

    /// Canonical bytes of the unsigned document.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CoreError> {
        canonical::canonicalize(&self.unsigned_value()?)
    }

    /// Content digest of the unsigned document. A pure function of the
    /// claims; attaching a proof does not change it.
    pub fn digest(&self) -> Result<String, CoreError> {
        canonical::digest(&self.unsigned_value()?)
    }

    /// Return a copy of this credential with the proof attached. The
    /// original value is consumed; a signed credential is never mutated in
    /// place.
    pub fn with_proof(mut self, proof: Proof) -> Self {
        self.proof = Some(proof);
        self
    }

    /// Number of subject claims.
    pub fn claim_count(&self) -> usize {
        self.subject.claims.len()
    }

    /// Whether the type list carries the base marker type.
    pub fn has_base_type(&self) -> bool {
        self.types.iter().any(|t| t == BASE_CREDENTIAL_TYPE)
    }

    /// Parse the issuance date.
    pub fn parsed_issuance_date(&self) -> Result<DateTime<Utc>, CoreError> {
        parse_rfc3339(&self.issuance_date)
    }

    /// Parse the expiration date, if present.
    pub fn parsed_expiration_date(&self) -> Option<Result<DateTime<Utc>, CoreError>> {
        self.expiration_date.as_deref().map(parse_rfc3339)
    }

    /// The first blockchain-anchor evidence entry, if any.
    pub fn anchor_evidence(&self) -> Option<&Evidence> {
        self.evidence.iter().find(|e| e.is_anchor())
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::InvalidTimestamp(format!("{s}: {e}")))
}

/// Builder for unsigned credentials.
pub struct CredentialBuilder {
    id: Option<String>,
    types: Vec<String>,
    issuer: String,
    issuance_date: Option<String>,
    expiration_date: Option<String>,
    subject: Subject,
    status: Option<StatusRef>,
    schema: Option<SchemaRef>,
    evidence: Vec<Evidence>,
}

impl CredentialBuilder {
    /// Start a builder for the given issuer.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            id: None,
            types: vec![BASE_CREDENTIAL_TYPE.to_string()],
            issuer: issuer.into(),
            issuance_date: None,
            expiration_date: None,
            subject: Subject::default(),
            status: None,
            schema: None,
            evidence: Vec::new(),
        }
    }

    /// Set the credential id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a type after the base marker.
    pub fn credential_type(mut self, ty: impl Into<String>) -> Self {
        let ty = ty.into();
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
        self
    }

    /// Set the subject identifier.
    pub fn subject_id(mut self, id: impl Into<String>) -> Self {
        self.subject.id = Some(id.into());
        self
    }

    /// Add a claim.
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.subject.claims.insert(name.into(), value.into());
        self
    }

    /// Set the issuance date (RFC 3339). Defaults to now.
    pub fn issuance_date(mut self, date: impl Into<String>) -> Self {
        self.issuance_date = Some(date.into());
        self
    }

    /// Set the expiration date (RFC 3339).
    pub fn expiration_date(mut self, date: impl Into<String>) -> Self {
        self.expiration_date = Some(date.into());
        self
    }

    /// Attach a status reference.
    pub fn status(mut self, status: StatusRef) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach a schema reference.
    pub fn schema(mut self, schema: SchemaRef) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Append an evidence entry.
    pub fn evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    /// Build the unsigned credential.
    pub fn build(self) -> Credential {
        let issuance_date = self
            .issuance_date
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true));

        Credential {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            id: self.id,
            types: self.types,
            issuer: self.issuer,
            issuance_date,
            expiration_date: self.expiration_date,
            subject: self.subject,
            status: self.status,
            schema: self.schema,
            evidence: self.evidence,
            proof: None,
        }
    }
}
