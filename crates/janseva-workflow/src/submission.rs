//! # Submission Gateway
//!
//! Converts a validated, OTP-verified form into a durable
//! [`ApplicationRecord`]. The backend is tried first; only when it
//! fails — and only in offline/demo mode — is a plausible record
//! fabricated locally so a disconnected kiosk can still hand the
//! citizen a receipt.
//!
//! The gateway itself is stateless; at-most-once submission per session
//! is enforced by the state machine, which stops calling once the
//! session's `result` is set.

use std::collections::BTreeMap;

use thiserror::Error;

use janseva_client::{NetworkClient, TimelineEntry};
use janseva_core::{FieldFormat, ReferenceNumber, ServiceDefinition, Timestamp};

use crate::session::ApplicationRecord;
use crate::status::ApplicationStatus;

/// Error from a submission attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The backend failed and offline fallback is not permitted.
    #[error("could not submit the application: {reason}")]
    Transport {
        /// Underlying transport failure.
        reason: String,
    },
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// The durable record, as printed on the receipt.
    pub record: ApplicationRecord,
    /// Whether the record was fabricated locally because the backend
    /// was unreachable. The workflow notes this in a warning banner.
    pub via_fallback: bool,
}

/// Stateless submission logic.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubmissionGateway;

impl SubmissionGateway {
    /// Submit the form for `service`, falling back to a locally
    /// fabricated record when the backend fails and
    /// `allow_offline_fallback` is set.
    ///
    /// # Errors
    ///
    /// [`SubmissionError::Transport`] when the backend fails and
    /// fallback is not permitted.
    pub fn submit(
        client: &dyn NetworkClient,
        service: &ServiceDefinition,
        form_values: &BTreeMap<String, String>,
        now: Timestamp,
        allow_offline_fallback: bool,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let normalized = Self::normalize(service, form_values);
        let summary = applicant_summary(service, &normalized);

        match client.submit_application(&service.id, &normalized) {
            Ok(response) => {
                tracing::info!(
                    service = %service.id,
                    reference = %response.reference_number,
                    "application submitted"
                );
                Ok(SubmissionOutcome {
                    record: ApplicationRecord {
                        reference_number: response.reference_number,
                        service_label: service.label_en.clone(),
                        applicant_summary: summary,
                        submitted_at: response.submitted_at,
                        eta_description: service.eta_description.clone(),
                        status: ApplicationStatus::from_code(&response.status),
                        timeline: response.timeline,
                    },
                    via_fallback: false,
                })
            }
            Err(e) if allow_offline_fallback => {
                let prefix = service.reference_prefix.as_deref().unwrap_or("APP");
                let reference = ReferenceNumber::generate(prefix, now);
                tracing::warn!(
                    service = %service.id,
                    reference = %reference,
                    error = %e,
                    "backend submit failed; fabricated local record"
                );
                Ok(SubmissionOutcome {
                    record: ApplicationRecord {
                        reference_number: reference,
                        service_label: service.label_en.clone(),
                        applicant_summary: summary,
                        submitted_at: now,
                        eta_description: service.eta_description.clone(),
                        status: ApplicationStatus::Submitted,
                        timeline: vec![TimelineEntry {
                            label: "Application recorded at kiosk".to_string(),
                            timestamp: now,
                        }],
                    },
                    via_fallback: true,
                })
            }
            Err(e) => Err(SubmissionError::Transport {
                reason: e.to_string(),
            }),
        }
    }

    /// Normalize form values for submission: trim everything, strip
    /// inner whitespace from digit-format fields, and add the composed
    /// `full_name` and `address` fields the backend schema expects.
    pub fn normalize(
        service: &ServiceDefinition,
        form_values: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut normalized = BTreeMap::new();
        for field in service.all_fields() {
            let Some(raw) = form_values.get(&field.key) else {
                continue;
            };
            let value = match field.format {
                FieldFormat::Mobile | FieldFormat::Aadhaar | FieldFormat::Pincode => {
                    raw.chars().filter(|c| !c.is_whitespace()).collect()
                }
                FieldFormat::FreeText | FieldFormat::Date => raw.trim().to_string(),
            };
            if !value.is_empty() {
                normalized.insert(field.key.clone(), value);
            }
        }

        let full_name = join_present(&normalized, &["first_name", "last_name"], " ");
        if !full_name.is_empty() {
            normalized.insert("full_name".to_string(), full_name);
        }
        let address = join_present(
            &normalized,
            &["house_no", "street", "city", "district", "pincode"],
            ", ",
        );
        if !address.is_empty() {
            normalized.insert("address".to_string(), address);
        }
        normalized
    }
}

/// One-line applicant summary for the receipt: best-available name plus
/// the masked mobile number.
fn applicant_summary(
    service: &ServiceDefinition,
    normalized: &BTreeMap<String, String>,
) -> String {
    let name = normalized
        .get("full_name")
        .or_else(|| normalized.get("name"))
        .or_else(|| normalized.get("aadhaar"))
        .or_else(|| normalized.get("epic_number"))
        .map(String::as_str)
        .unwrap_or("Applicant");

    let mobile = service
        .all_fields()
        .find(|f| f.format == FieldFormat::Mobile)
        .and_then(|f| normalized.get(&f.key))
        .and_then(|raw| janseva_core::MobileNumber::parse(raw).ok());

    match mobile {
        Some(mobile) => format!("{name} ({})", mobile.masked()),
        None => name.to_string(),
    }
}

fn join_present(values: &BTreeMap<String, String>, keys: &[&str], sep: &str) -> String {
    keys.iter()
        .filter_map(|k| values.get(*k))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(sep)
}

// ─── Tests ───────────────────────────────────────────────────────────
