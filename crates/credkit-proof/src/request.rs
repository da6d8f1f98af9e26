//! Issuance requests: what a caller hands the issuer.

use chrono::{Duration, SecondsFormat, Utc};

use credkit_core::{Evidence, ProofFormat, SchemaRef, StatusRef, Subject, BASE_CREDENTIAL_TYPE};

/// A request to issue a credential in a specific proof format.
#[derive(Debug, Clone)]
pub struct IssuanceRequest {
    /// Which engine should produce the proof.
    pub format: ProofFormat,

    /// Issuer identifier (DID).
    pub issuer: String,

    /// Reference to the issuer's signing key, usually `<did>#<fragment>`.
    pub key_ref: String,

    /// Subject identifier and claims.
    pub subject: Subject,

    /// Credential types. The base marker is added automatically if missing.
    pub types: Vec<String>,

    /// Explicit credential id; generated when absent.
    pub id: Option<String>,

    /// Issuance time (RFC 3339); defaults to now.
    pub issuance_date: Option<String>,

    /// Explicit expiration (RFC 3339).
    pub expiration_date: Option<String>,

    /// Validity window relative to the issuance time. Ignored when
    /// `expiration_date` is set.
    pub valid_for: Option<Duration>,

    /// Revocation status reference to embed.
    pub status: Option<StatusRef>,

    /// Schema reference to embed.
    pub schema: Option<SchemaRef>,

    /// Evidence entries to embed.
    pub evidence: Vec<Evidence>,
}

impl IssuanceRequest {
    /// A minimal request; extend it with the `with_*` methods.
    pub fn new(
        format: ProofFormat,
        issuer: impl Into<String>,
        key_ref: impl Into<String>,
    ) -> Self {
        Self {
            format,
            issuer: issuer.into(),
            key_ref: key_ref.into(),
            subject: Subject::default(),
            types: vec![BASE_CREDENTIAL_TYPE.to_string()],
            id: None,
            issuance_date: None,
            expiration_date: None,
            valid_for: None,
            status: None,
            schema: None,
            evidence: Vec::new(),
        }
    }

    /// Add a credential type.
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        let ty = ty.into();
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
        self
    }

    /// Replace the type list wholesale. Used by callers that control the
    /// full list, including the base marker.
    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    /// Set the subject identifier.
    pub fn with_subject_id(mut self, id: impl Into<String>) -> Self {
        self.subject.id = Some(id.into());
        self
    }

    /// Add a subject claim.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.subject.claims.insert(name.into(), value.into());
        self
    }

    /// Set an explicit credential id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an explicit issuance time.
    pub fn with_issuance_date(mut self, date: impl Into<String>) -> Self {
        self.issuance_date = Some(date.into());
        self
    }

    /// Set an explicit expiration time.
    pub fn with_expiration_date(mut self, date: impl Into<String>) -> Self {
        self.expiration_date = Some(date.into());
        self
    }

    /// Set a validity window relative to issuance.
    pub fn with_validity(mut self, window: Duration) -> Self {
        self.valid_for = Some(window);
        self
    }

    /// Embed a status reference.
    pub fn with_status(mut self, status: StatusRef) -> Self {
        self.status = Some(status);
        self
    }

    /// Embed a schema reference.
    pub fn with_schema(mut self, schema: SchemaRef) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Append an evidence entry.
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    /// The effective issuance time: the explicit one, or now.
    pub fn effective_issuance_date(&self) -> String {
        self.issuance_date
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
