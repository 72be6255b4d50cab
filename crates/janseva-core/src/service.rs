//! # Service Catalog Types
//!
//! Defines the immutable configuration that drives the step sequencer:
//! which steps a service walks through, which fields each step collects,
//! and which documents the citizen must attest to holding.
//!
//! ## Design
//!
//! A [`ServiceDefinition`] is selected once when a session starts and is
//! treated as read-only configuration from then on. All per-service
//! behavior (does this flow need OTP? which reference prefix tags its
//! records?) is expressed as data here rather than as conditionals
//! scattered through the state machine.

use serde::{Deserialize, Serialize};

use crate::identity::ServiceId;

// ─── Steps ───────────────────────────────────────────────────────────

/// The kind of a workflow step, which determines its gating rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// Collects form fields; gated by field validation.
    FormEntry,
    /// Collects document-availability attestations; gated by the checklist.
    DocumentChecklist,
    /// Confirms control of the mobile number; gated by OTP verification.
    OtpVerification,
    /// Read-only recap of entered data; leaving it forward means submit.
    Review,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FormEntry => "FORM_ENTRY",
            Self::DocumentChecklist => "DOCUMENT_CHECKLIST",
            Self::OtpVerification => "OTP_VERIFICATION",
            Self::Review => "REVIEW",
        };
        f.write_str(s)
    }
}

/// One stage of a service flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    /// The gating rule for this step.
    pub kind: StepKind,
    /// Step title shown by the rendering surface.
    pub title: String,
    /// Fields collected at this step (empty for non-form steps).
    pub fields: Vec<FieldSpec>,
}

// ─── Fields ──────────────────────────────────────────────────────────

/// Format constraint applied to a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldFormat {
    /// No format constraint beyond required-ness.
    FreeText,
    /// Exactly 10 digits after stripping whitespace.
    Mobile,
    /// Exactly 6 digits.
    Pincode,
    /// Exactly 12 digits after stripping whitespace.
    Aadhaar,
    /// `DD/MM/YYYY` as printed on EPIC and Aadhaar cards.
    Date,
}

/// Declaration of one form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key under which the value is stored in the session form map.
    pub key: String,
    /// Label shown by the rendering surface (and in error messages).
    pub label: String,
    /// Whether an empty value blocks progression.
    pub required: bool,
    /// Format constraint.
    pub format: FieldFormat,
}

impl FieldSpec {
    /// A required field.
    pub fn required(key: &str, label: &str, format: FieldFormat) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            required: true,
            format,
        }
    }

    /// An optional field.
    pub fn optional(key: &str, label: &str, format: FieldFormat) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            required: false,
            format,
        }
    }
}

// ─── Documents ───────────────────────────────────────────────────────

/// Declaration of one checklist document.
///
/// Attestation is the citizen's self-reported confirmation that the
/// document is in hand; the kiosk does not verify authenticity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSpec {
    /// English label.
    pub label_en: String,
    /// Hindi label.
    pub label_hi: String,
    /// Whether a missing attestation blocks progression.
    pub mandatory: bool,
}

impl DocumentSpec {
    /// A mandatory document.
    pub fn mandatory(label_en: &str, label_hi: &str) -> Self {
        Self {
            label_en: label_en.to_string(),
            label_hi: label_hi.to_string(),
            mandatory: true,
        }
    }

    /// An optional document.
    pub fn optional(label_en: &str, label_hi: &str) -> Self {
        Self {
            label_en: label_en.to_string(),
            label_hi: label_hi.to_string(),
            mandatory: false,
        }
    }
}

// ─── Service Definition ──────────────────────────────────────────────

/// Which backend lookup a terminal form step triggers, for services that
/// end in a displayed result instead of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupKind {
    /// Search records by the entered query fields.
    Search,
    /// Fetch a record plus a short-lived download grant.
    Download,
    /// Look up the processing status of a reference number.
    Status,
}

/// Immutable definition of one offered service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Catalog key.
    pub id: ServiceId,
    /// English label.
    pub label_en: String,
    /// Hindi label.
    pub label_hi: String,
    /// Reference-number family prefix for submission services
    /// (`None` for pure lookup services, which produce no records).
    pub reference_prefix: Option<String>,
    /// The lookup this service performs instead of submitting
    /// (`None` for submission services).
    pub lookup: Option<LookupKind>,
    /// Human-readable processing-time estimate printed on receipts.
    pub eta_description: String,
    /// Ordered steps of the flow.
    pub steps: Vec<StepSpec>,
    /// Documents to attest (empty when the flow has no checklist step).
    pub documents: Vec<DocumentSpec>,
}

impl ServiceDefinition {
    /// The step at `index`, if within bounds.
    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        self.steps.get(index)
    }

    /// Whether this flow includes an OTP verification step.
    pub fn requires_otp(&self) -> bool {
        self.steps
            .iter()
            .any(|s| s.kind == StepKind::OtpVerification)
    }

    /// Whether this flow ends in a submission (as opposed to a lookup
    /// that terminates at a displayed result).
    pub fn is_submission(&self) -> bool {
        self.steps.iter().any(|s| s.kind == StepKind::Review)
    }

    /// All field specs across all steps, in step order.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
