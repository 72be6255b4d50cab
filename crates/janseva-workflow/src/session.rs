//! # Session State
//!
//! The mutable state of one citizen interaction, owned exclusively by
//! the [`ApplicationStateMachine`] and never shared. The rendering
//! surface sees it only through [`SessionSnapshot`], a serializable
//! read-only view that never contains a live OTP code.
//!
//! Because the machine hands out `&mut` access to nothing and the
//! snapshot is a copy, there is no way for the surface to mutate
//! workflow state behind the engine's back.
//!
//! [`ApplicationStateMachine`]: crate::machine::ApplicationStateMachine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use janseva_client::{DownloadGrant, SearchResults, TimelineEntry};
use janseva_core::{
    FieldFormat, MobileNumber, ReferenceNumber, ServiceDefinition, ServiceId, SessionId,
    StepKind, Timestamp,
};
use janseva_otp::{OtpConfig, OtpDelivery, OtpManager};

use crate::status::{ApplicationStatus, StatusResult};

// ─── Banner ──────────────────────────────────────────────────────────

/// Severity of the transient global message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Something went wrong; red banner.
    Error,
    /// Degraded operation (e.g., fallback mode in use).
    Warning,
    /// A step completed.
    Success,
    /// Neutral information (e.g., the demo-mode OTP code).
    Info,
}

/// Transient banner text shown above the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// Banner text.
    pub text: String,
    /// Display severity.
    pub severity: Severity,
}

impl Banner {
    pub(crate) fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Error }
    }

    pub(crate) fn warning(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Warning }
    }

    pub(crate) fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Success }
    }

    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Info }
    }
}

// ─── Terminal Payloads ───────────────────────────────────────────────

/// A durable application record, as printed on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    /// Unique reference number for later status lookup.
    pub reference_number: ReferenceNumber,
    /// English label of the submitted service.
    pub service_label: String,
    /// One-line applicant summary (name and masked mobile).
    pub applicant_summary: String,
    /// When the application was recorded.
    pub submitted_at: Timestamp,
    /// Human-readable processing-time estimate.
    pub eta_description: String,
    /// Current processing status.
    pub status: ApplicationStatus,
    /// Processing timeline, append-only, oldest first.
    pub timeline: Vec<TimelineEntry>,
}

/// Terminal payload of a finished flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionResult {
    /// A submission flow produced a receipt.
    Application(ApplicationRecord),
    /// A search flow produced matches.
    Search(SearchResults),
    /// A download flow produced a grant.
    Download(DownloadGrant),
    /// A status-check flow produced a status.
    Status(StatusResult),
}

// ─── Session ─────────────────────────────────────────────────────────

/// Mutable state of one citizen interaction.
#[derive(Debug)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) service: ServiceDefinition,
    pub(crate) current_step: usize,
    pub(crate) form_values: BTreeMap<String, String>,
    pub(crate) field_errors: BTreeMap<String, String>,
    pub(crate) document_attestation: BTreeMap<usize, bool>,
    pub(crate) otp: OtpManager,
    pub(crate) global_message: Option<Banner>,
    pub(crate) result: Option<SessionResult>,
}

impl Session {
    pub(crate) fn new(service: ServiceDefinition, otp_config: OtpConfig) -> Self {
        Self {
            id: SessionId::new(),
            service,
            current_step: 0,
            form_values: BTreeMap::new(),
            field_errors: BTreeMap::new(),
            document_attestation: BTreeMap::new(),
            otp: OtpManager::new(otp_config),
            global_message: None,
            result: None,
        }
    }

    /// The mobile number entered in the first mobile-format field, if
    /// present and valid. OTP delivery targets this number.
    pub(crate) fn mobile_value(&self) -> Option<MobileNumber> {
        let field = self
            .service
            .all_fields()
            .find(|f| f.format == FieldFormat::Mobile)?;
        let raw = self.form_values.get(&field.key)?;
        MobileNumber::parse(raw).ok()
    }

    /// Read-only serializable view for the rendering surface.
    pub fn snapshot(&self) -> SessionSnapshot {
        let step = self.service.step(self.current_step);
        SessionSnapshot {
            session_id: self.id,
            service_id: self.service.id.clone(),
            service_label_en: self.service.label_en.clone(),
            service_label_hi: self.service.label_hi.clone(),
            step_index: self.current_step,
            step_count: self.service.steps.len(),
            step_kind: step.map(|s| s.kind),
            step_title: step.map(|s| s.title.clone()).unwrap_or_default(),
            form_values: self.form_values.clone(),
            field_errors: self.field_errors.clone(),
            document_attestation: self.document_attestation.clone(),
            otp: self.otp.state().map(|s| OtpSnapshot {
                delivery: s.delivery(),
                issued_at: s.issued_at(),
                expires_at: s.expires_at(),
                cooldown_until: s.cooldown_until(),
            }),
            otp_verified: self.otp.is_verified(),
            global_message: self.global_message.clone(),
            result: self.result.clone(),
        }
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────

/// Read-only view of the outstanding OTP. Carries timing and delivery
/// channel only — the code itself is not part of any snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpSnapshot {
    /// How the code was delivered.
    pub delivery: OtpDelivery,
    /// When it was issued.
    pub issued_at: Timestamp,
    /// When it expires.
    pub expires_at: Timestamp,
    /// When resend becomes permitted.
    pub cooldown_until: Timestamp,
}

/// Read-only view of a [`Session`] for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identifier.
    pub session_id: SessionId,
    /// Selected service.
    pub service_id: ServiceId,
    /// English service label.
    pub service_label_en: String,
    /// Hindi service label.
    pub service_label_hi: String,
    /// Current step (0-based).
    pub step_index: usize,
    /// Total steps in the flow.
    pub step_count: usize,
    /// Kind of the current step (`None` only for an empty flow).
    pub step_kind: Option<StepKind>,
    /// Title of the current step.
    pub step_title: String,
    /// Entered form values.
    pub form_values: BTreeMap<String, String>,
    /// Field errors from the last blocked forward transition.
    pub field_errors: BTreeMap<String, String>,
    /// Document attestation by checklist index.
    pub document_attestation: BTreeMap<usize, bool>,
    /// Outstanding OTP timing, if a code is live.
    pub otp: Option<OtpSnapshot>,
    /// Whether the mobile number was verified this session.
    pub otp_verified: bool,
    /// Transient banner.
    pub global_message: Option<Banner>,
    /// Terminal payload once the flow finishes.
    pub result: Option<SessionResult>,
}

// ─── Tests ───────────────────────────────────────────────────────────
