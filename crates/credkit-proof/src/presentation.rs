//! Presentations: credentials packaged for a relying party.

use serde::{Deserialize, Serialize};

use credkit_core::{Credential, CREDENTIALS_CONTEXT};

/// The marker type every presentation carries.
pub const BASE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// What the relying party asked to see.
#[derive(Debug, Clone, Default)]
pub struct PresentationRequest {
    /// Identifier of the holder assembling the presentation.
    pub holder: Option<String>,

    /// Claim names to reveal. `None` reveals everything; engines without
    /// selective disclosure ignore this.
    pub disclose: Option<Vec<String>>,
}

impl PresentationRequest {
    /// Reveal everything.
    pub fn full() -> Self {
        Self::default()
    }

    /// Reveal only the named claims.
    pub fn disclosing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            holder: None,
            disclose: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Set the holder identifier.
    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = Some(holder.into());
        self
    }

    /// Whether a claim name should be revealed.
    pub fn reveals(&self, name: &str) -> bool {
        match &self.disclose {
            None => true,
            Some(names) => names.iter().any(|n| n == name),
        }
    }
}

/// A presentation of one or more credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Presentation types.
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Identifier of the presenting holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,

    /// The presented credentials.
    #[serde(rename = "verifiableCredential")]
    pub credentials: Vec<Credential>,
}

impl Presentation {
    /// Assemble a presentation envelope around the given credentials.
    pub fn new(credentials: Vec<Credential>, holder: Option<String>) -> Self {
        Self {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            types: vec![BASE_PRESENTATION_TYPE.to_string()],
            holder,
            credentials,
        }
    }
}
