//! # Application State Machine
//!
//! The single entry point for the rendering surface. Owns the session,
//! sequences the steps of the selected service, and delegates to the
//! validators, OTP manager, submission gateway, and status tracker.
//!
//! ## Step Sequencing
//!
//! ```text
//! start() ──▶ FormEntry ──▶ DocumentChecklist ──▶ OtpVerification ──▶ Review ──submit()──▶ receipt
//!                │                                                                            (terminal)
//!                └── lookup services: advance() runs the lookup and terminates at the result
//! ```
//!
//! Every forward transition re-runs the gating check for the step being
//! left; backward transitions are unconditional and clear only the
//! errors of the step being re-entered.
//!
//! ## Concurrency
//!
//! All operations take `&mut self`: the borrow checker serializes them,
//! so a second operation of the same kind cannot start while one is in
//! progress, and no network result can ever be applied to a session
//! other than the one that issued the call. The rendering surface is
//! expected to disable the triggering control while a call is
//! outstanding; `SessionSnapshot::session_id` lets it drop renders that
//! belong to an abandoned session.

use std::sync::Arc;

use thiserror::Error;

use janseva_client::{ClientError, NetworkClient, SearchQuery};
use janseva_core::{
    Clock, FieldFormat, ReferenceNumber, ServiceDefinition, ServiceId, StepKind, SystemClock,
};
use janseva_otp::{OtpConfig, OtpError};
use janseva_validate::{all_required_attested, missing_documents, validate};

use crate::catalog;
use crate::session::{ApplicationRecord, Banner, Session, SessionResult, SessionSnapshot};
use crate::status::StatusTracker;
use crate::submission::{SubmissionError, SubmissionGateway};

// ─── Configuration ───────────────────────────────────────────────────

/// Engine-level configuration.
#[derive(Debug, Clone, Default)]
pub struct WorkflowConfig {
    /// Whether backend failures may fall back to locally fabricated
    /// OTP codes and application records. Off by default: a production
    /// kiosk must not silently accept an unverified citizen because of
    /// a network blip.
    pub offline_demo: bool,
    /// OTP lifecycle tunables.
    pub otp: OtpConfig,
}

impl WorkflowConfig {
    /// Configuration for demo/disconnected kiosks: all fallbacks on.
    pub fn offline_demo() -> Self {
        Self {
            offline_demo: true,
            otp: OtpConfig::offline_demo(),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from workflow operations.
///
/// None of these are fatal: field and document errors resolve within
/// the step, OTP errors resolve by retry/resend, and the worst case is
/// a `reset()` back to service selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// No session has been started (or it was reset).
    #[error("no active session; select a service first")]
    NoActiveSession,

    /// The requested service is not in the catalog.
    #[error("unknown service: {id}")]
    UnknownService {
        /// The requested service id.
        id: String,
    },

    /// The current step's fields did not validate.
    #[error("{error_count} field(s) need correction")]
    ValidationFailed {
        /// How many fields failed.
        error_count: usize,
    },

    /// Mandatory documents are not yet attested.
    #[error("required documents not confirmed: {}", missing.join(", "))]
    DocumentsIncomplete {
        /// English labels of the unattested mandatory documents.
        missing: Vec<String>,
    },

    /// The OTP step's gate: the mobile number is not verified yet.
    #[error("mobile number must be verified before continuing")]
    OtpRequired,

    /// Leaving the review step forward requires `submit()`.
    #[error("use submit to complete the application")]
    SubmitRequired,

    /// The transition would leave the flow's step range, or the flow
    /// has already terminated.
    #[error("no such transition from the current step")]
    StepBoundary,

    /// A document toggle referenced a checklist index that does not exist.
    #[error("no document at checklist index {index}")]
    InvalidDocumentIndex {
        /// The out-of-range index.
        index: usize,
    },

    /// OTP was requested but no valid mobile number is in the form.
    #[error("enter a valid 10-digit mobile number first")]
    MissingMobileNumber,

    /// An OTP lifecycle failure (expiry, mismatch, cooldown, ...).
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// A submission failure with fallback disabled.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// A lookup found no matching record.
    #[error("no record found for {reference}")]
    NotFound {
        /// The queried identifier, echoed for display.
        reference: String,
    },

    /// A lookup could not reach the backend (lookups have no fallback).
    #[error("service unavailable: {reason}")]
    Transport {
        /// Underlying transport failure.
        reason: String,
    },
}

// ─── Machine ─────────────────────────────────────────────────────────

/// The kiosk workflow engine. One instance per kiosk; one session at a
/// time.
pub struct ApplicationStateMachine<C: NetworkClient> {
    client: C,
    config: WorkflowConfig,
    catalog: Vec<ServiceDefinition>,
    clock: Arc<dyn Clock>,
    session: Option<Session>,
}

impl<C: NetworkClient> ApplicationStateMachine<C> {
    /// An engine over the built-in catalog with the system clock.
    pub fn new(client: C, config: WorkflowConfig) -> Self {
        Self::with_clock(client, config, Arc::new(SystemClock))
    }

    /// An engine with an explicit clock (tests step a [`ManualClock`]
    /// past OTP expiry and cooldown boundaries).
    ///
    /// [`ManualClock`]: janseva_core::ManualClock
    pub fn with_clock(client: C, config: WorkflowConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            config,
            catalog: catalog::builtin_services(),
            clock,
            session: None,
        }
    }

    /// The offered services, in menu order.
    pub fn services(&self) -> &[ServiceDefinition] {
        &self.catalog
    }

    /// Read-only view of the active session, if any.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session.as_ref().map(Session::snapshot)
    }

    /// Begin a new session for `service_id`, discarding any previous one.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::UnknownService`] for ids not in the catalog.
    pub fn start(&mut self, service_id: &ServiceId) -> Result<(), WorkflowError> {
        let service = self
            .catalog
            .iter()
            .find(|s| &s.id == service_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownService {
                id: service_id.to_string(),
            })?;
        let session = Session::new(service, self.config.otp.clone());
        tracing::info!(service = %service_id, session = %session.id, "session started");
        self.session = Some(session);
        Ok(())
    }

    /// Discard the session (flow abandoned or kiosk idle timeout).
    pub fn reset(&mut self) {
        if let Some(session) = &self.session {
            tracing::debug!(session = %session.id, "session reset");
        }
        self.session = None;
    }

    /// Store a form value. Clears that field's error and any banner.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), WorkflowError> {
        let session = self.session_mut()?;
        session.form_values.insert(key.to_string(), value.to_string());
        session.field_errors.remove(key);
        session.global_message = None;
        Ok(())
    }

    /// Flip the attestation of the document at `index`.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::InvalidDocumentIndex`] past the checklist end.
    pub fn toggle_document(&mut self, index: usize) -> Result<(), WorkflowError> {
        let session = self.session_mut()?;
        if index >= session.service.documents.len() {
            return Err(WorkflowError::InvalidDocumentIndex { index });
        }
        let entry = session.document_attestation.entry(index).or_insert(false);
        *entry = !*entry;
        session.global_message = None;
        Ok(())
    }

    /// Try to leave the current step forward, re-running its gate.
    ///
    /// For lookup services the final form step does not advance — it
    /// runs the lookup and terminates the flow at the result.
    ///
    /// # Errors
    ///
    /// The gate failure for the current step kind; see [`WorkflowError`].
    pub fn advance(&mut self) -> Result<(), WorkflowError> {
        let session = self.session.as_mut().ok_or(WorkflowError::NoActiveSession)?;
        if session.result.is_some() {
            return Err(WorkflowError::StepBoundary);
        }
        let step = session
            .service
            .step(session.current_step)
            .ok_or(WorkflowError::StepBoundary)?;

        match step.kind {
            StepKind::FormEntry => {
                let errors = validate(&step.fields, &session.form_values);
                if !errors.is_empty() {
                    let error_count = errors.len();
                    session.field_errors = errors
                        .into_iter()
                        .map(|(key, err)| (key, err.to_string()))
                        .collect();
                    session.global_message =
                        Some(Banner::error("Please correct the highlighted fields"));
                    return Err(WorkflowError::ValidationFailed { error_count });
                }
                session.field_errors.clear();
                if let Some(lookup) = session.service.lookup {
                    if session.current_step + 1 == session.service.steps.len() {
                        return match run_lookup(&self.client, session, lookup) {
                            Ok(()) => Ok(()),
                            Err(e) => {
                                session.global_message = Some(Banner::error(e.to_string()));
                                Err(e)
                            }
                        };
                    }
                }
            }
            StepKind::DocumentChecklist => {
                if !all_required_attested(&session.service.documents, &session.document_attestation)
                {
                    let missing: Vec<String> = missing_documents(
                        &session.service.documents,
                        &session.document_attestation,
                    )
                    .into_iter()
                    .map(String::from)
                    .collect();
                    session.global_message = Some(Banner::error(format!(
                        "Please confirm you have: {}",
                        missing.join(", ")
                    )));
                    return Err(WorkflowError::DocumentsIncomplete { missing });
                }
            }
            StepKind::OtpVerification => {
                if !session.otp.is_verified() {
                    session.global_message =
                        Some(Banner::error("Verify your mobile number to continue"));
                    return Err(WorkflowError::OtpRequired);
                }
            }
            StepKind::Review => return Err(WorkflowError::SubmitRequired),
        }

        if session.current_step + 1 >= session.service.steps.len() {
            return Err(WorkflowError::StepBoundary);
        }
        session.current_step += 1;
        session.global_message = None;
        tracing::debug!(
            session = %session.id,
            step = session.current_step,
            "advanced to step"
        );
        Ok(())
    }

    /// Go back one step. Unconditional; clears the errors of the step
    /// being re-entered and preserves all form values.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::StepBoundary`] at the first step or after the
    /// flow has terminated.
    pub fn retreat(&mut self) -> Result<(), WorkflowError> {
        let session = self.session_mut()?;
        if session.result.is_some() || session.current_step == 0 {
            return Err(WorkflowError::StepBoundary);
        }
        session.current_step -= 1;
        if let Some(step) = session.service.step(session.current_step) {
            for field in &step.fields {
                session.field_errors.remove(&field.key);
            }
        }
        session.global_message = None;
        Ok(())
    }

    /// Send an OTP to the mobile number entered earlier in the form.
    ///
    /// On fallback delivery the generated code is surfaced through the
    /// info banner — the diagnostic channel — and nowhere else.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::MissingMobileNumber`] without a valid mobile in
    /// the form; OTP lifecycle errors otherwise.
    pub fn send_otp(&mut self) -> Result<(), WorkflowError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(WorkflowError::NoActiveSession)?;
        require_step(session, StepKind::OtpVerification)?;
        let mobile = session
            .mobile_value()
            .ok_or(WorkflowError::MissingMobileNumber)?;

        match session.otp.send(&self.client, &mobile, now) {
            Ok(issue) => {
                session.global_message = Some(match issue.fallback_code {
                    Some(code) => {
                        Banner::info(format!("Service unreachable — demo verification code: {code}"))
                    }
                    None => Banner::info(format!("Verification code sent to {}", mobile.masked())),
                });
                Ok(())
            }
            Err(e) => {
                session.global_message = Some(Banner::error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Re-send the OTP after the cooldown has elapsed.
    ///
    /// # Errors
    ///
    /// [`OtpError::Cooldown`] with the remaining seconds, among others.
    pub fn resend_otp(&mut self) -> Result<(), WorkflowError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(WorkflowError::NoActiveSession)?;
        require_step(session, StepKind::OtpVerification)?;

        match session.otp.resend(&self.client, now) {
            Ok(issue) => {
                session.global_message = Some(match issue.fallback_code {
                    Some(code) => {
                        Banner::info(format!("Service unreachable — demo verification code: {code}"))
                    }
                    None => Banner::info("A new verification code has been sent".to_string()),
                });
                Ok(())
            }
            Err(e) => {
                session.global_message = Some(Banner::error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Verify an entered OTP code.
    ///
    /// # Errors
    ///
    /// OTP lifecycle errors ([`OtpError::CodeExpired`],
    /// [`OtpError::CodeMismatch`], ...).
    pub fn verify_otp(&mut self, code: &str) -> Result<(), WorkflowError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(WorkflowError::NoActiveSession)?;
        require_step(session, StepKind::OtpVerification)?;

        match session.otp.verify(&self.client, code, now) {
            Ok(()) => {
                session.global_message = Some(Banner::success("Mobile number verified"));
                Ok(())
            }
            Err(e) => {
                session.global_message = Some(Banner::error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Submit the application from the review step.
    ///
    /// At most one submission per session: once a record exists, this
    /// is a no-op returning the same record.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::OtpRequired`] when the flow's OTP gate is not
    /// satisfied; [`SubmissionError::Transport`] when the backend fails
    /// and fallback is disabled.
    pub fn submit(&mut self) -> Result<ApplicationRecord, WorkflowError> {
        let now = self.clock.now();
        let session = self.session.as_mut().ok_or(WorkflowError::NoActiveSession)?;

        if let Some(SessionResult::Application(record)) = &session.result {
            return Ok(record.clone());
        }
        require_step(session, StepKind::Review)?;
        if session.service.requires_otp() && !session.otp.is_verified() {
            return Err(WorkflowError::OtpRequired);
        }

        match SubmissionGateway::submit(
            &self.client,
            &session.service,
            &session.form_values,
            now,
            self.config.offline_demo,
        ) {
            Ok(outcome) => {
                let record = outcome.record;
                session.global_message = Some(if outcome.via_fallback {
                    Banner::warning(format!(
                        "Recorded at kiosk while the service is unreachable. Reference: {}",
                        record.reference_number
                    ))
                } else {
                    Banner::success(format!(
                        "Application submitted. Reference: {}",
                        record.reference_number
                    ))
                });
                session.result = Some(SessionResult::Application(record.clone()));
                Ok(record)
            }
            Err(e) => {
                session.global_message = Some(Banner::error(e.to_string()));
                Err(e.into())
            }
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session, WorkflowError> {
        self.session.as_mut().ok_or(WorkflowError::NoActiveSession)
    }
}

/// Gate an operation on the current step kind.
fn require_step(session: &Session, kind: StepKind) -> Result<(), WorkflowError> {
    match session.service.step(session.current_step) {
        Some(step) if step.kind == kind => Ok(()),
        _ => Err(WorkflowError::StepBoundary),
    }
}

/// Run the terminal lookup of a search/download/status service and
/// store its result, ending the flow.
fn run_lookup(
    client: &dyn NetworkClient,
    session: &mut Session,
    lookup: janseva_core::LookupKind,
) -> Result<(), WorkflowError> {
    use janseva_core::LookupKind;

    let result = match lookup {
        LookupKind::Search => {
            let mut query = SearchQuery::default();
            for (key, value) in &session.form_values {
                let value = value.trim();
                if !value.is_empty() {
                    query.fields.insert(key.clone(), value.to_string());
                }
            }
            let results = client.search_records(&query).map_err(lookup_error)?;
            if results.total == 0 {
                session.global_message = Some(Banner::info("No matching records found"));
            }
            SessionResult::Search(results)
        }
        LookupKind::Download => {
            let identifier = lookup_field_value(session, FieldFormat::Aadhaar);
            let dob = lookup_field_value(session, FieldFormat::Date);
            let grant = client
                .fetch_record_for_download(&identifier, &dob)
                .map_err(lookup_error)?;
            SessionResult::Download(grant)
        }
        LookupKind::Status => {
            let raw = session
                .form_values
                .get("reference_number")
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            let reference = ReferenceNumber::from_backend(raw);
            let status = StatusTracker::lookup(client, &reference).map_err(lookup_error)?;
            SessionResult::Status(status)
        }
    };

    session.result = Some(result);
    tracing::debug!(session = %session.id, "lookup completed");
    Ok(())
}

/// The normalized value of the first field with the given format.
fn lookup_field_value(session: &Session, format: FieldFormat) -> String {
    session
        .service
        .all_fields()
        .find(|f| f.format == format)
        .and_then(|f| session.form_values.get(&f.key))
        .map(|v| {
            if matches!(format, FieldFormat::Aadhaar) {
                v.chars().filter(|c| !c.is_whitespace()).collect()
            } else {
                v.trim().to_string()
            }
        })
        .unwrap_or_default()
}

fn lookup_error(e: ClientError) -> WorkflowError {
    match e {
        ClientError::NotFound { reference } => WorkflowError::NotFound { reference },
        other => WorkflowError::Transport {
            reason: other.to_string(),
        },
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use janseva_client::{InMemoryNetworkClient, SearchRecord, UnreachableNetworkClient};
    use janseva_core::{ManualClock, Timestamp};

    use crate::session::Severity;
    use crate::status::ApplicationStatus;

    fn t0() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn offline_machine() -> (
        ApplicationStateMachine<UnreachableNetworkClient>,
        Arc<ManualClock>,
    ) {
        let clock = Arc::new(ManualClock::new(t0()));
        let machine = ApplicationStateMachine::with_clock(
            UnreachableNetworkClient,
            WorkflowConfig::offline_demo(),
            clock.clone(),
        );
        (machine, clock)
    }

    fn fill_registration<C: NetworkClient>(m: &mut ApplicationStateMachine<C>) {
        for (key, value) in [
            ("first_name", "Asha"),
            ("last_name", "Devi"),
            ("relation_name", "Ram Lal"),
            ("dob", "01/05/1990"),
            ("mobile", "9876543210"),
            ("street", "MG Road"),
            ("city", "Ajmer"),
            ("district", "Ajmer"),
            ("pincode", "305001"),
        ] {
            m.set_field(key, value).unwrap();
        }
    }

    /// Pull the fallback code out of the info banner: the 6-digit token,
    /// wherever the copy puts it.
    fn demo_code<C: NetworkClient>(m: &ApplicationStateMachine<C>) -> String {
        let banner = m.snapshot().unwrap().global_message.unwrap();
        assert_eq!(banner.severity, Severity::Info);
        banner
            .text
            .split_whitespace()
            .find(|t| t.len() == 6 && t.chars().all(|c| c.is_ascii_digit()))
            .expect("info banner should carry the 6-digit fallback code")
            .to_string()
    }

    /// Drive an offline registration session to the review step.
    fn reach_review(m: &mut ApplicationStateMachine<UnreachableNetworkClient>) {
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(m);
        m.advance().unwrap();
        for index in 0..3 {
            m.toggle_document(index).unwrap();
        }
        m.advance().unwrap();
        m.send_otp().unwrap();
        let code = demo_code(m);
        m.verify_otp(&code).unwrap();
        m.advance().unwrap();
    }

    // ── end-to-end registration (offline) ────────────────────────────

    #[test]
    fn test_full_registration_flow_offline() {
        let (mut m, _clock) = offline_machine();
        reach_review(&mut m);

        let snap = m.snapshot().unwrap();
        assert_eq!(snap.step_kind, Some(StepKind::Review));

        let record = m.submit().unwrap();
        assert!(!record.reference_number.as_str().is_empty());
        assert!(record.reference_number.has_prefix("NVR"));
        assert_eq!(record.status, ApplicationStatus::Submitted);
        assert!(record.timeline.len() <= 1);
        assert!(record.applicant_summary.contains("Asha Devi"));

        let snap = m.snapshot().unwrap();
        assert!(matches!(snap.result, Some(SessionResult::Application(_))));
        assert_eq!(snap.global_message.unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_full_registration_flow_with_backend() {
        let client = InMemoryNetworkClient::new();
        let mut m = ApplicationStateMachine::new(client, WorkflowConfig::default());
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.advance().unwrap();
        for index in 0..3 {
            m.toggle_document(index).unwrap();
        }
        m.advance().unwrap();
        m.send_otp().unwrap();
        // Network delivery: the banner names the masked number, never a code.
        let banner = m.snapshot().unwrap().global_message.unwrap();
        assert!(banner.text.contains("XXXXXX3210"));
        assert_eq!(
            m.verify_otp("not-the-code"),
            Err(WorkflowError::Otp(OtpError::CodeMismatch))
        );
    }

    // ── validation gating ────────────────────────────────────────────

    #[test]
    fn test_advance_never_advances_with_invalid_fields() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();

        let result = m.advance();
        assert!(matches!(result, Err(WorkflowError::ValidationFailed { .. })));
        let snap = m.snapshot().unwrap();
        assert_eq!(snap.step_index, 0);
        assert!(snap.field_errors.contains_key("mobile"));
        assert_eq!(snap.global_message.unwrap().severity, Severity::Error);

        // Partially fix and retry: still blocked, still step 0.
        m.set_field("mobile", "9876543210").unwrap();
        assert!(m.advance().is_err());
        assert_eq!(m.snapshot().unwrap().step_index, 0);
    }

    #[test]
    fn test_set_field_clears_its_error() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        let _ = m.advance();
        assert!(m.snapshot().unwrap().field_errors.contains_key("mobile"));

        m.set_field("mobile", "9876543210").unwrap();
        let snap = m.snapshot().unwrap();
        assert!(!snap.field_errors.contains_key("mobile"));
        // Other fields' errors stay until edited.
        assert!(snap.field_errors.contains_key("first_name"));
    }

    // ── document gating ──────────────────────────────────────────────

    #[test]
    fn test_documents_gate_blocks_until_all_mandatory() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.advance().unwrap();

        let result = m.advance();
        match result {
            Err(WorkflowError::DocumentsIncomplete { missing }) => {
                assert_eq!(missing.len(), 3);
            }
            other => panic!("expected DocumentsIncomplete, got {other:?}"),
        }

        m.toggle_document(0).unwrap();
        m.toggle_document(1).unwrap();
        assert!(m.advance().is_err());
        m.toggle_document(2).unwrap();
        // Optional Aadhaar card (index 3) left unattested.
        m.advance().unwrap();
        assert_eq!(m.snapshot().unwrap().step_kind, Some(StepKind::OtpVerification));
    }

    #[test]
    fn test_toggle_document_out_of_range() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        assert_eq!(
            m.toggle_document(99),
            Err(WorkflowError::InvalidDocumentIndex { index: 99 })
        );
    }

    #[test]
    fn test_toggle_document_flips_back() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        m.toggle_document(0).unwrap();
        assert_eq!(m.snapshot().unwrap().document_attestation.get(&0), Some(&true));
        m.toggle_document(0).unwrap();
        assert_eq!(m.snapshot().unwrap().document_attestation.get(&0), Some(&false));
    }

    // ── OTP gating ───────────────────────────────────────────────────

    #[test]
    fn test_otp_step_blocks_until_verified() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.advance().unwrap();
        for index in 0..3 {
            m.toggle_document(index).unwrap();
        }
        m.advance().unwrap();

        assert_eq!(m.advance(), Err(WorkflowError::OtpRequired));

        m.send_otp().unwrap();
        let code = demo_code(&m);
        assert_eq!(m.advance(), Err(WorkflowError::OtpRequired));
        m.verify_otp(&code).unwrap();
        m.advance().unwrap();
        assert_eq!(m.snapshot().unwrap().step_kind, Some(StepKind::Review));
    }

    #[test]
    fn test_fallback_code_recoverable_from_banner() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.advance().unwrap();
        for index in 0..3 {
            m.toggle_document(index).unwrap();
        }
        m.advance().unwrap();
        m.send_otp().unwrap();

        // The code never appears in the snapshot itself, only in the
        // info banner, as a single 6-digit token that verifies.
        let snap = m.snapshot().unwrap();
        assert!(snap.otp.is_some());
        let digit_tokens: Vec<&str> = snap
            .global_message
            .as_ref()
            .unwrap()
            .text
            .split_whitespace()
            .filter(|t| t.len() == 6 && t.chars().all(|c| c.is_ascii_digit()))
            .collect();
        assert_eq!(digit_tokens.len(), 1);
        m.verify_otp(digit_tokens[0]).unwrap();
    }

    #[test]
    fn test_send_otp_requires_mobile_in_form() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("aadhaar-lock-unlock")).unwrap();
        m.set_field("aadhaar", "1234 5678 9012").unwrap();
        m.set_field("action", "lock").unwrap();
        m.set_field("mobile", "9876543210").unwrap();
        m.advance().unwrap();

        // Validation passed earlier, but the field can still be cleared.
        m.set_field("mobile", "").unwrap();
        assert_eq!(m.send_otp(), Err(WorkflowError::MissingMobileNumber));
    }

    #[test]
    fn test_send_otp_outside_otp_step_is_boundary() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        assert_eq!(m.send_otp(), Err(WorkflowError::StepBoundary));
    }

    #[test]
    fn test_otp_expiry_fails_verify() {
        let (mut m, clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.advance().unwrap();
        for index in 0..3 {
            m.toggle_document(index).unwrap();
        }
        m.advance().unwrap();
        m.send_otp().unwrap();
        let code = demo_code(&m);

        clock.advance_secs(301);
        assert_eq!(
            m.verify_otp(&code),
            Err(WorkflowError::Otp(OtpError::CodeExpired))
        );
        assert!(!m.snapshot().unwrap().otp_verified);
    }

    #[test]
    fn test_resend_cooldown_strictly_decreasing() {
        let (mut m, clock) = offline_machine();
        m.start(&ServiceId::new("aadhaar-pvc-order")).unwrap();
        m.set_field("aadhaar", "1234 5678 9012").unwrap();
        m.set_field("mobile", "9876543210").unwrap();
        m.set_field("pincode", "305001").unwrap();
        m.advance().unwrap();
        m.send_otp().unwrap();

        clock.advance_secs(10);
        let r1 = m.resend_otp();
        assert_eq!(
            r1,
            Err(WorkflowError::Otp(OtpError::Cooldown { remaining_secs: 50 }))
        );
        clock.advance_secs(20);
        let r2 = m.resend_otp();
        assert_eq!(
            r2,
            Err(WorkflowError::Otp(OtpError::Cooldown { remaining_secs: 30 }))
        );
        clock.advance_secs(30);
        m.resend_otp().unwrap();
    }

    #[test]
    fn test_otp_transport_error_without_fallback() {
        let clock = std::sync::Arc::new(ManualClock::new(t0()));
        let mut m = ApplicationStateMachine::with_clock(
            UnreachableNetworkClient,
            WorkflowConfig::default(),
            clock,
        );
        m.start(&ServiceId::new("aadhaar-pvc-order")).unwrap();
        m.set_field("aadhaar", "1234 5678 9012").unwrap();
        m.set_field("mobile", "9876543210").unwrap();
        m.set_field("pincode", "305001").unwrap();
        m.advance().unwrap();

        let result = m.send_otp();
        assert!(matches!(result, Err(WorkflowError::Otp(OtpError::Transport { .. }))));
        assert_eq!(
            m.snapshot().unwrap().global_message.unwrap().severity,
            Severity::Error
        );
    }

    // ── retreat ──────────────────────────────────────────────────────

    #[test]
    fn test_retreat_preserves_values_and_clears_reentered_errors() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.advance().unwrap();

        m.retreat().unwrap();
        let snap = m.snapshot().unwrap();
        assert_eq!(snap.step_index, 0);
        assert_eq!(snap.form_values.get("first_name").unwrap(), "Asha");
        assert!(snap.field_errors.is_empty());
    }

    #[test]
    fn test_retreat_at_first_step_is_boundary() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        assert_eq!(m.retreat(), Err(WorkflowError::StepBoundary));
    }

    // ── submission ───────────────────────────────────────────────────

    #[test]
    fn test_submit_at_most_once_per_session() {
        let (mut m, _clock) = offline_machine();
        reach_review(&mut m);

        let first = m.submit().unwrap();
        let second = m.submit().unwrap();
        assert_eq!(first.reference_number, second.reference_number);
        assert_eq!(first.submitted_at, second.submitted_at);
    }

    #[test]
    fn test_submit_before_review_is_boundary() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        assert_eq!(m.submit(), Err(WorkflowError::StepBoundary));
    }

    #[test]
    fn test_no_transitions_after_terminal() {
        let (mut m, _clock) = offline_machine();
        reach_review(&mut m);
        m.submit().unwrap();

        assert_eq!(m.advance(), Err(WorkflowError::StepBoundary));
        assert_eq!(m.retreat(), Err(WorkflowError::StepBoundary));
    }

    #[test]
    fn test_submit_transport_error_without_fallback_keeps_session() {
        let clock = std::sync::Arc::new(ManualClock::new(t0()));
        let mut m = ApplicationStateMachine::with_clock(
            UnreachableNetworkClient,
            WorkflowConfig {
                offline_demo: false,
                otp: OtpConfig::offline_demo(),
            },
            clock,
        );
        // OTP fallback on, submission fallback off: reach review, then
        // watch submit surface the transport failure and stay put.
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.advance().unwrap();
        for index in 0..3 {
            m.toggle_document(index).unwrap();
        }
        m.advance().unwrap();
        m.send_otp().unwrap();
        let code = demo_code(&m);
        m.verify_otp(&code).unwrap();
        m.advance().unwrap();

        let result = m.submit();
        assert!(matches!(
            result,
            Err(WorkflowError::Submission(SubmissionError::Transport { .. }))
        ));
        let snap = m.snapshot().unwrap();
        assert!(snap.result.is_none());
        assert_eq!(snap.step_kind, Some(StepKind::Review));
    }

    // ── lookup flows ─────────────────────────────────────────────────

    fn seeded_backend() -> InMemoryNetworkClient {
        let client = InMemoryNetworkClient::new();
        let mut details = BTreeMap::new();
        details.insert("district".to_string(), "Ajmer".to_string());
        client.add_record(
            SearchRecord {
                identifier: "123456789012".to_string(),
                name: "Asha Devi".to_string(),
                details,
            },
            "01/05/1990",
        );
        client
    }

    #[test]
    fn test_search_flow_terminates_at_result() {
        let mut m = ApplicationStateMachine::new(seeded_backend(), WorkflowConfig::default());
        m.start(&ServiceId::new("voter-search")).unwrap();
        m.set_field("name", "Asha").unwrap();
        m.advance().unwrap();

        let snap = m.snapshot().unwrap();
        match snap.result {
            Some(SessionResult::Search(results)) => {
                assert_eq!(results.total, 1);
                assert_eq!(results.records[0].name, "Asha Devi");
            }
            other => panic!("expected search result, got {other:?}"),
        }
        // Terminal: no further advancing.
        assert_eq!(m.advance(), Err(WorkflowError::StepBoundary));
    }

    #[test]
    fn test_search_no_matches_banner() {
        let mut m = ApplicationStateMachine::new(seeded_backend(), WorkflowConfig::default());
        m.start(&ServiceId::new("voter-search")).unwrap();
        m.set_field("name", "Nobody").unwrap();
        m.advance().unwrap();

        let snap = m.snapshot().unwrap();
        match snap.result {
            Some(SessionResult::Search(results)) => assert_eq!(results.total, 0),
            other => panic!("expected search result, got {other:?}"),
        }
        assert_eq!(snap.global_message.unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_download_flow() {
        let mut m = ApplicationStateMachine::new(seeded_backend(), WorkflowConfig::default());
        m.start(&ServiceId::new("aadhaar-download")).unwrap();
        m.set_field("aadhaar", "1234 5678 9012").unwrap();
        m.set_field("dob", "01/05/1990").unwrap();
        m.advance().unwrap();

        let snap = m.snapshot().unwrap();
        match snap.result {
            Some(SessionResult::Download(grant)) => {
                assert!(grant.download_url.contains("123456789012"));
                assert!(grant.expires_in_secs > 0);
            }
            other => panic!("expected download grant, got {other:?}"),
        }
    }

    #[test]
    fn test_download_wrong_dob_not_found() {
        let mut m = ApplicationStateMachine::new(seeded_backend(), WorkflowConfig::default());
        m.start(&ServiceId::new("aadhaar-download")).unwrap();
        m.set_field("aadhaar", "1234 5678 9012").unwrap();
        m.set_field("dob", "02/06/1991").unwrap();

        let result = m.advance();
        assert!(matches!(result, Err(WorkflowError::NotFound { .. })));
        let snap = m.snapshot().unwrap();
        assert!(snap.result.is_none());
        assert!(snap.global_message.unwrap().text.contains("123456789012"));
    }

    #[test]
    fn test_status_lookup_happy_path() {
        let client = InMemoryNetworkClient::new();
        let response = client
            .submit_application(&ServiceId::new("voter-new-registration"), &BTreeMap::new())
            .unwrap();
        let reference = response.reference_number.as_str().to_string();
        client.set_status(&response.reference_number, "approved", Timestamp::now());

        let mut m = ApplicationStateMachine::new(client, WorkflowConfig::default());
        m.start(&ServiceId::new("status-check")).unwrap();
        m.set_field("reference_number", &format!(" {reference} ")).unwrap();
        m.advance().unwrap();

        let snap = m.snapshot().unwrap();
        match snap.result {
            Some(SessionResult::Status(status)) => {
                assert_eq!(status.status, ApplicationStatus::Approved);
                assert_eq!(status.descriptor.label_en, "Approved");
                assert_eq!(status.timeline.len(), 2);
            }
            other => panic!("expected status result, got {other:?}"),
        }
    }

    #[test]
    fn test_status_lookup_not_found_echoes_reference() {
        let mut m = ApplicationStateMachine::new(
            InMemoryNetworkClient::new(),
            WorkflowConfig::default(),
        );
        m.start(&ServiceId::new("status-check")).unwrap();
        m.set_field("reference_number", "does-not-exist").unwrap();

        let result = m.advance();
        match result {
            Err(WorkflowError::NotFound { reference }) => {
                assert_eq!(reference, "does-not-exist");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        let banner = m.snapshot().unwrap().global_message.unwrap();
        assert!(banner.text.contains("does-not-exist"));
        assert_eq!(banner.severity, Severity::Error);
    }

    // ── session lifecycle ────────────────────────────────────────────

    #[test]
    fn test_start_unknown_service() {
        let (mut m, _clock) = offline_machine();
        let result = m.start(&ServiceId::new("passport-renewal"));
        assert_eq!(
            result,
            Err(WorkflowError::UnknownService {
                id: "passport-renewal".to_string()
            })
        );
        assert!(m.snapshot().is_none());
    }

    #[test]
    fn test_reset_discards_everything() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        m.reset();

        assert!(m.snapshot().is_none());
        assert_eq!(m.advance(), Err(WorkflowError::NoActiveSession));
        assert_eq!(
            m.set_field("mobile", "9876543210"),
            Err(WorkflowError::NoActiveSession)
        );
    }

    #[test]
    fn test_start_replaces_previous_session() {
        let (mut m, _clock) = offline_machine();
        m.start(&ServiceId::new("voter-new-registration")).unwrap();
        fill_registration(&mut m);
        let first_id = m.snapshot().unwrap().session_id;

        m.start(&ServiceId::new("voter-correction")).unwrap();
        let snap = m.snapshot().unwrap();
        assert_ne!(snap.session_id, first_id);
        assert!(snap.form_values.is_empty());
        assert_eq!(snap.step_index, 0);
    }

    #[test]
    fn test_services_lists_catalog() {
        let (m, _clock) = offline_machine();
        assert_eq!(m.services().len(), 7);
    }
}
