//! The credential verifier: a multi-check state machine.
//!
//! One `verify()` call runs six independent checks — proof, issuer,
//! expiration, revocation, schema, anchor — concurrently and reports every
//! enabled one, even after another has already failed. Each check isolates
//! its own collaborator failures into its own result field; `valid` is the
//! AND over all enabled checks.
//!
//! Security-sensitive conditions (absent proof, blank proof fields,
//! signature mismatch, unresolvable issuer) are always hard failures.
//! Availability conditions (missing status collaborator, unparseable
//! expiration, missing schema definition) pass with a warning unless
//! `fail_on_unavailable` is set.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, warn};

use credkit_core::Credential;
use credkit_proof::{EngineRegistry, Resolver};
use credkit_schema::{SchemaError, SchemaRegistry};

use crate::anchor::AnchorVerifier;
use crate::options::VerificationOptions;
use crate::result::{VerificationError, VerificationResult};
use crate::schema_store::SchemaStore;
use crate::status::StatusList;

/// Default bound on concurrently verified credentials in a batch.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// Outcome of one check.
#[derive(Debug, Default)]
struct Check {
    ok: bool,
    errors: Vec<VerificationError>,
    warnings: Vec<String>,
}

impl Check {
    fn pass() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    fn pass_with_warning(warning: impl Into<String>) -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: vec![warning.into()],
        }
    }

    fn fail(error: VerificationError) -> Self {
        Self {
            ok: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

/// Verifies credentials against wired collaborators.
///
/// The engine registry and resolver are required; the status list, anchor
/// verifier, and schema store are optional and their absence degrades the
/// matching check.
#[derive(Clone)]
pub struct Verifier {
    engines: Arc<EngineRegistry>,
    resolver: Arc<dyn Resolver>,
    schemas: Arc<SchemaRegistry>,
    status_list: Option<Arc<dyn StatusList>>,
    anchor_verifier: Option<Arc<dyn AnchorVerifier>>,
    schema_store: Option<Arc<dyn SchemaStore>>,
    batch_concurrency: usize,
}

impl Verifier {
    /// A verifier with the required collaborators and a default schema
    /// registry (bundled JSON Schema validator).
    pub fn new(engines: Arc<EngineRegistry>, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            engines,
            resolver,
            schemas: Arc::new(SchemaRegistry::with_defaults()),
            status_list: None,
            anchor_verifier: None,
            schema_store: None,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Wire a status-list collaborator.
    pub fn with_status_list(mut self, status_list: Arc<dyn StatusList>) -> Self {
        self.status_list = Some(status_list);
        self
    }

    /// Wire an anchor-verification collaborator.
    pub fn with_anchor_verifier(mut self, anchor_verifier: Arc<dyn AnchorVerifier>) -> Self {
        self.anchor_verifier = Some(anchor_verifier);
        self
    }

    /// Wire a schema-definition store.
    pub fn with_schema_store(mut self, schema_store: Arc<dyn SchemaStore>) -> Self {
        self.schema_store = Some(schema_store);
        self
    }

    /// Replace the schema validator registry.
    pub fn with_schema_registry(mut self, schemas: Arc<SchemaRegistry>) -> Self {
        self.schemas = schemas;
        self
    }

    /// Bound the batch worker pool.
    pub fn with_batch_concurrency(mut self, limit: usize) -> Self {
        self.batch_concurrency = limit.max(1);
        self
    }

    /// Run every enabled check over one credential and aggregate.
    pub async fn verify(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> VerificationResult {
        debug!(issuer = %credential.issuer, "verifying credential");

        let (proof, issuer, expiration, revocation, schema, anchor) = tokio::join!(
            self.check_proof(credential, options),
            self.check_issuer(credential, options),
            self.check_expiration(credential, options),
            self.check_revocation(credential, options),
            self.check_schema(credential, options),
            self.check_anchor(credential, options),
        );

        let (proof, engine_issuer) = proof;

        // The engine's statement about the verification method's controller
        // is ANDed into the issuer verdict.
        let issuer_ok = issuer.ok && engine_issuer.unwrap_or(true);

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for check in [&proof, &issuer, &expiration, &revocation, &schema, &anchor] {
            errors.extend(check.errors.iter().cloned());
            warnings.extend(check.warnings.iter().cloned());
        }

        let valid =
            proof.ok && issuer_ok && expiration.ok && revocation.ok && schema.ok && anchor.ok;

        if !valid {
            warn!(
                issuer = %credential.issuer,
                errors = errors.len(),
                "credential failed verification"
            );
        }

        VerificationResult {
            proof_valid: proof.ok,
            issuer_valid: issuer_ok,
            not_expired: expiration.ok,
            not_revoked: revocation.ok,
            schema_valid: schema.ok,
            blockchain_anchor_valid: anchor.ok,
            valid,
            errors,
            warnings,
        }
    }

    /// Verify a batch. Items are independent — no shared state, no
    /// cross-contamination — and run behind a bounded worker pool. Results
    /// come back in input order.
    pub async fn verify_all(
        &self,
        credentials: &[Credential],
        options: &VerificationOptions,
    ) -> Vec<VerificationResult> {
        let semaphore = Arc::new(Semaphore::new(self.batch_concurrency));
        let mut set = JoinSet::new();

        for (index, credential) in credentials.iter().cloned().enumerate() {
            let verifier = self.clone();
            let options = options.clone();
            let semaphore = Arc::clone(&semaphore);
            set.spawn(async move {
                // The semaphore is never closed; a failed acquire only
                // means shutdown, in which case running unthrottled is fine.
                let _permit = semaphore.acquire_owned().await.ok();
                (index, verifier.verify(&credential, &options).await)
            });
        }

        let mut slots: Vec<Option<VerificationResult>> =
            credentials.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("verification task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| VerificationResult {
                    proof_valid: false,
                    issuer_valid: false,
                    not_expired: false,
                    not_revoked: false,
                    schema_valid: false,
                    blockchain_anchor_valid: false,
                    valid: false,
                    errors: vec![VerificationError::Collaborator(
                        "verification task failed".to_string(),
                    )],
                    warnings: Vec::new(),
                })
            })
            .collect()
    }

    /// Proof check. Always runs; an absent proof is a hard failure
    /// regardless of options. Returns the engine's issuer statement
    /// alongside.
    async fn check_proof(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> (Check, Option<bool>) {
        let proof = match &credential.proof {
            Some(proof) => proof,
            None => {
                return (
                    Check::fail(VerificationError::InvalidProof(
                        "credential has no proof".to_string(),
                    )),
                    None,
                )
            }
        };

        let format = proof.format();
        let engine = match self.engines.get(format) {
            Some(engine) => engine,
            None => {
                return (
                    Check::fail(VerificationError::UnsupportedFormat(format!(
                        "no engine registered for proof format {format}"
                    ))),
                    None,
                )
            }
        };

        // The engine call includes the resolver round-trip, so the whole
        // thing runs under the collaborator bound.
        let check = match timeout(options.collaborator_timeout, engine.verify(credential)).await {
            Ok(check) => check,
            Err(_) => {
                return (
                    Check::fail(VerificationError::Collaborator(
                        "proof verification timed out".to_string(),
                    )),
                    None,
                )
            }
        };

        let outcome = Check {
            ok: check.proof_valid,
            errors: check
                .errors
                .into_iter()
                .map(VerificationError::InvalidProof)
                .collect(),
            warnings: Vec::new(),
        };
        (outcome, check.issuer_valid)
    }

    /// Issuer check. Always runs: resolve the issuer identifier; any
    /// failure is recorded, never thrown.
    async fn check_issuer(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Check {
        if credential.issuer.trim().is_empty() {
            return Check::fail(VerificationError::InvalidIssuer(
                "issuer is blank".to_string(),
            ));
        }

        match timeout(
            options.collaborator_timeout,
            self.resolver.resolve(&credential.issuer),
        )
        .await
        {
            Ok(Ok(Some(_))) => Check::pass(),
            Ok(Ok(None)) => Check::fail(VerificationError::InvalidIssuer(format!(
                "issuer could not be resolved: {}",
                credential.issuer
            ))),
            Ok(Err(e)) => Check::fail(VerificationError::InvalidIssuer(format!(
                "issuer resolution failed: {e}"
            ))),
            Err(_) => Check::fail(VerificationError::Collaborator(
                "issuer resolution timed out".to_string(),
            )),
        }
    }

    /// Expiration check. Unparseable dates degrade; a past expiration is
    /// always an error.
    async fn check_expiration(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Check {
        if !options.check_expiration {
            return Check::pass();
        }

        let now = Utc::now();
        let mut check = Check::pass();

        match credential.parsed_issuance_date() {
            Ok(issued) if issued > now => {
                if options.fail_on_unavailable {
                    check.ok = false;
                    check.errors.push(VerificationError::NotYetValid(format!(
                        "issuance date {} is in the future",
                        credential.issuance_date
                    )));
                } else {
                    check
                        .warnings
                        .push("credential issuance date is in the future".to_string());
                }
            }
            Ok(_) => {}
            Err(_) => check
                .warnings
                .push("invalid issuance date format".to_string()),
        }

        match credential.parsed_expiration_date() {
            None => {}
            Some(Err(_)) => {
                if options.fail_on_unavailable {
                    check.ok = false;
                    check.errors.push(VerificationError::Expired(
                        "invalid expiration date format".to_string(),
                    ));
                } else {
                    check
                        .warnings
                        .push("invalid expiration date format".to_string());
                }
            }
            Some(Ok(expiration)) if expiration <= now => {
                check.ok = false;
                check.errors.push(VerificationError::Expired(format!(
                    "expiration date {} is in the past",
                    credential
                        .expiration_date
                        .as_deref()
                        .unwrap_or_default()
                )));
            }
            Some(Ok(_)) => {}
        }

        check
    }

    /// Revocation check. Missing collaborator degrades; a backend failure
    /// fails the check, never the call.
    async fn check_revocation(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Check {
        if !options.check_revocation {
            return Check::pass();
        }

        let status = match &credential.status {
            Some(status) => status,
            None => return Check::pass(),
        };

        let status_list = match &self.status_list {
            Some(status_list) => status_list,
            None => {
                let message =
                    "revocation checking requested but no status list collaborator is available";
                return if options.fail_on_unavailable {
                    Check::fail(VerificationError::Collaborator(message.to_string()))
                } else {
                    Check::pass_with_warning(message)
                };
            }
        };

        match timeout(
            options.collaborator_timeout,
            status_list.is_revoked(status, status.index),
        )
        .await
        {
            Ok(Ok(false)) => Check::pass(),
            Ok(Ok(true)) => Check::fail(VerificationError::Revoked(format!(
                "status list {} reports the credential revoked",
                status.id
            ))),
            Ok(Err(e)) => Check::fail(VerificationError::Collaborator(format!(
                "status list lookup failed: {e}"
            ))),
            Err(_) => Check::fail(VerificationError::Collaborator(
                "status list lookup timed out".to_string(),
            )),
        }
    }

    /// Schema check. Missing definitions and validators degrade; actual
    /// violations fail.
    async fn check_schema(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Check {
        if !options.validate_schema {
            return Check::pass();
        }

        let schema_ref = match &credential.schema {
            Some(schema_ref) => schema_ref,
            None => return Check::pass(),
        };

        let store = match &self.schema_store {
            Some(store) => store,
            None => {
                let message =
                    "schema validation requested but no schema store collaborator is available";
                return if options.fail_on_unavailable {
                    Check::fail(VerificationError::SchemaValidationFailed(
                        message.to_string(),
                    ))
                } else {
                    Check::pass_with_warning(message)
                };
            }
        };

        let definition = match timeout(options.collaborator_timeout, store.fetch(&schema_ref.id))
            .await
        {
            Ok(Ok(Some(definition))) => definition,
            Ok(Ok(None)) => {
                let message = format!("no schema definition found for {}", schema_ref.id);
                return if options.fail_on_unavailable {
                    Check::fail(VerificationError::SchemaValidationFailed(message))
                } else {
                    Check::pass_with_warning(message)
                };
            }
            Ok(Err(e)) => {
                return Check::fail(VerificationError::Collaborator(format!(
                    "schema definition lookup failed: {e}"
                )))
            }
            Err(_) => {
                return Check::fail(VerificationError::Collaborator(
                    "schema definition lookup timed out".to_string(),
                ))
            }
        };

        let subject = match serde_json::to_value(&credential.subject) {
            Ok(subject) => subject,
            Err(e) => {
                return Check::fail(VerificationError::SchemaValidationFailed(format!(
                    "subject serialization failed: {e}"
                )))
            }
        };

        match self.schemas.validate_subject(&subject, &definition, None) {
            Ok(report) if report.valid => Check::pass(),
            Ok(report) => Check {
                ok: false,
                errors: report
                    .errors
                    .into_iter()
                    .map(VerificationError::SchemaValidationFailed)
                    .collect(),
                warnings: Vec::new(),
            },
            Err(SchemaError::NoValidator(format)) => {
                let message = format!("no schema validator registered for format {format}");
                if options.fail_on_unavailable {
                    Check::fail(VerificationError::SchemaValidationFailed(message))
                } else {
                    Check::pass_with_warning(message)
                }
            }
            Err(e) => Check::fail(VerificationError::SchemaValidationFailed(e.to_string())),
        }
    }

    /// Anchor check. Structure first (chain id + transaction reference),
    /// then the chain lookup.
    async fn check_anchor(
        &self,
        credential: &Credential,
        options: &VerificationOptions,
    ) -> Check {
        if !options.verify_blockchain_anchor {
            return Check::pass();
        }

        let evidence = match credential.anchor_evidence() {
            Some(evidence) => evidence,
            None => return Check::pass(),
        };

        if evidence.string_property("chainId").is_none() {
            return Check::fail(VerificationError::InvalidAnchor(
                "anchor evidence is missing a chain id".to_string(),
            ));
        }
        if evidence.string_property("transactionHash").is_none() {
            return Check::fail(VerificationError::InvalidAnchor(
                "anchor evidence is missing a transaction reference".to_string(),
            ));
        }

        let anchor_verifier = match &self.anchor_verifier {
            Some(anchor_verifier) => anchor_verifier,
            None => {
                let message =
                    "anchor verification requested but no anchor verifier collaborator is available";
                return if options.fail_on_unavailable {
                    Check::fail(VerificationError::Collaborator(message.to_string()))
                } else {
                    Check::pass_with_warning(message)
                };
            }
        };

        match timeout(
            options.collaborator_timeout,
            anchor_verifier.verify_anchor(evidence),
        )
        .await
        {
            Ok(Ok(true)) => Check::pass(),
            Ok(Ok(false)) => Check::fail(VerificationError::InvalidAnchor(
                "anchor could not be verified on chain".to_string(),
            )),
            Ok(Err(e)) => Check::fail(VerificationError::Collaborator(format!(
                "anchor verification failed: {e}"
            ))),
            Err(_) => Check::fail(VerificationError::Collaborator(
                "anchor verification timed out".to_string(),
            )),
        }
    }
}
