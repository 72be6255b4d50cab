//! # Status Tracker
//!
//! Looks up a previously submitted application by reference number and
//! maps the backend's raw status code to a presentation-ready bilingual
//! descriptor.
//!
//! ## Schema Drift
//!
//! The backend's status vocabulary changes ahead of kiosk deployments.
//! Unknown codes therefore pass through as-is with a neutral color tag
//! instead of failing the lookup.

use serde::{Deserialize, Serialize};

use janseva_client::{ClientError, NetworkClient, TimelineEntry};
use janseva_core::ReferenceNumber;

// ─── Status Codes ────────────────────────────────────────────────────

/// Processing status of a submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    /// Application received by the backend.
    Submitted,
    /// Awaiting the booth-level officer's field visit.
    PendingFieldVerification,
    /// Field verification completed.
    FieldVerified,
    /// Under departmental review.
    UnderReview,
    /// Approved; card/record issuance follows.
    Approved,
    /// Rejected (terminal).
    Rejected,
    /// Card printed.
    Printed,
    /// Card dispatched by post.
    Dispatched,
    /// Card delivered (terminal).
    Delivered,
    /// A code this kiosk build does not know; passed through verbatim.
    Unknown(String),
}

impl ApplicationStatus {
    /// Parse a raw backend status code. Never fails: unrecognized codes
    /// become [`ApplicationStatus::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "submitted" => Self::Submitted,
            "pending_field_verification" => Self::PendingFieldVerification,
            "field_verified" => Self::FieldVerified,
            "under_review" => Self::UnderReview,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            "printed" => Self::Printed,
            "dispatched" => Self::Dispatched,
            "delivered" => Self::Delivered,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The raw status code.
    pub fn code(&self) -> &str {
        match self {
            Self::Submitted => "submitted",
            Self::PendingFieldVerification => "pending_field_verification",
            Self::FieldVerified => "field_verified",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Printed => "printed",
            Self::Dispatched => "dispatched",
            Self::Delivered => "delivered",
            Self::Unknown(code) => code,
        }
    }

    /// The presentation descriptor for this status. Pure function of
    /// the code: two lookups of the same code yield identical
    /// descriptors.
    pub fn descriptor(&self) -> StatusDescriptor {
        let (label_en, label_hi, color) = match self {
            Self::Submitted => ("Submitted", "जमा किया गया", ColorTag::Blue),
            Self::PendingFieldVerification => {
                ("Pending Field Verification", "क्षेत्र सत्यापन लंबित", ColorTag::Amber)
            }
            Self::FieldVerified => ("Field Verified", "क्षेत्र सत्यापित", ColorTag::Blue),
            Self::UnderReview => ("Under Review", "समीक्षा में", ColorTag::Amber),
            Self::Approved => ("Approved", "स्वीकृत", ColorTag::Green),
            Self::Rejected => ("Rejected", "अस्वीकृत", ColorTag::Red),
            Self::Printed => ("Printed", "मुद्रित", ColorTag::Blue),
            Self::Dispatched => ("Dispatched", "प्रेषित", ColorTag::Blue),
            Self::Delivered => ("Delivered", "वितरित", ColorTag::Green),
            Self::Unknown(code) => {
                return StatusDescriptor {
                    label_en: code.clone(),
                    label_hi: code.clone(),
                    color: ColorTag::Neutral,
                }
            }
        };
        StatusDescriptor {
            label_en: label_en.to_string(),
            label_hi: label_hi.to_string(),
            color,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// Serialized as the raw code so snapshots and stored records survive
// kiosk builds that learn new codes.
impl Serialize for ApplicationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

// ─── Descriptor ──────────────────────────────────────────────────────

/// Color family the rendering surface uses for a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    /// In-progress, informational.
    Blue,
    /// Waiting on someone.
    Amber,
    /// Positive terminal-ish outcomes.
    Green,
    /// Negative outcomes.
    Red,
    /// Unknown codes.
    Neutral,
}

/// Presentation-ready rendering of a status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDescriptor {
    /// English label.
    pub label_en: String,
    /// Hindi label.
    pub label_hi: String,
    /// Color family for the status chip.
    pub color: ColorTag,
}

/// Outcome of a status lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult {
    /// The queried reference number.
    pub reference_number: ReferenceNumber,
    /// Parsed status.
    pub status: ApplicationStatus,
    /// Presentation descriptor for the status.
    pub descriptor: StatusDescriptor,
    /// Processing timeline, oldest first.
    pub timeline: Vec<TimelineEntry>,
}

// ─── Tracker ─────────────────────────────────────────────────────────

/// Reference-number status lookup against the backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusTracker;

impl StatusTracker {
    /// Look up `reference` and map the response for presentation.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] (echoing the queried reference) when
    /// the backend has no matching record; [`ClientError::Transport`]
    /// when it cannot be reached.
    pub fn lookup(
        client: &dyn NetworkClient,
        reference: &ReferenceNumber,
    ) -> Result<StatusResult, ClientError> {
        let response = client.get_status(reference)?;
        let status = ApplicationStatus::from_code(&response.status);
        let descriptor = status.descriptor();
        Ok(StatusResult {
            reference_number: response.reference_number,
            status,
            descriptor,
            timeline: response.timeline,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
