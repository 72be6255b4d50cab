//! # Bundled NetworkClient Implementations
//!
//! [`InMemoryNetworkClient`] stands in for the government backend with a
//! record store in memory — it backs the demo CLI and most tests.
//! [`UnreachableNetworkClient`] fails every call with a transport error,
//! which is exactly what a kiosk in a connectivity-poor district sees;
//! tests use it to drive the engine's fallback paths.

use std::collections::BTreeMap;
use std::sync::Mutex;

use rand::Rng;

use janseva_core::{MobileNumber, ReferenceNumber, ServiceId, Timestamp};

use crate::messages::{
    DownloadGrant, SearchQuery, SearchRecord, SearchResults, StatusResponse,
    SubmissionResponse, TimelineEntry,
};
use crate::traits::{ClientError, NetworkClient};

// ─── In-Memory Client ────────────────────────────────────────────────

/// A backend stand-in holding OTPs, applications, and searchable records
/// in memory.
#[derive(Debug, Default)]
pub struct InMemoryNetworkClient {
    /// Outstanding OTP codes by mobile number.
    otps: Mutex<BTreeMap<String, String>>,
    /// Submitted applications by reference number.
    applications: Mutex<BTreeMap<String, StatusResponse>>,
    /// Seeded searchable records with their date of birth.
    records: Mutex<Vec<(SearchRecord, String)>>,
    /// Monotonic counter for minted reference numbers.
    next_serial: Mutex<u64>,
}

impl InMemoryNetworkClient {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a searchable/downloadable record.
    pub fn add_record(&self, record: SearchRecord, date_of_birth: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((record, date_of_birth.to_string()));
        }
    }

    /// The code most recently issued for `mobile`, if any.
    ///
    /// Test/demo accessor — a real backend never reveals codes.
    pub fn issued_code(&self, mobile: &MobileNumber) -> Option<String> {
        self.otps
            .lock()
            .ok()
            .and_then(|otps| otps.get(mobile.as_str()).cloned())
    }

    /// Overwrite the raw status code of a stored application.
    ///
    /// Lets the demo CLI and tests simulate backend-side processing
    /// progress between submission and lookup.
    pub fn set_status(&self, reference: &ReferenceNumber, status: &str, at: Timestamp) {
        if let Ok(mut apps) = self.applications.lock() {
            if let Some(app) = apps.get_mut(reference.as_str()) {
                app.status = status.to_string();
                app.timeline.push(TimelineEntry {
                    label: format!("Status changed to {status}"),
                    timestamp: at,
                });
            }
        }
    }

    fn locked<T>(result: std::sync::LockResult<T>) -> Result<T, ClientError> {
        result.map_err(|_| ClientError::Transport("backend store poisoned".to_string()))
    }
}

impl NetworkClient for InMemoryNetworkClient {
    fn send_otp(&self, mobile: &MobileNumber) -> Result<(), ClientError> {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let mut otps = Self::locked(self.otps.lock())?;
        otps.insert(mobile.as_str().to_string(), code);
        Ok(())
    }

    fn verify_otp(&self, mobile: &MobileNumber, code: &str) -> Result<(), ClientError> {
        let mut otps = Self::locked(self.otps.lock())?;
        match otps.get(mobile.as_str()) {
            Some(stored) if stored == code.trim() => {
                otps.remove(mobile.as_str());
                Ok(())
            }
            _ => Err(ClientError::InvalidCode),
        }
    }

    fn submit_application(
        &self,
        service: &ServiceId,
        fields: &BTreeMap<String, String>,
    ) -> Result<SubmissionResponse, ClientError> {
        let serial = {
            let mut next = Self::locked(self.next_serial.lock())?;
            *next += 1;
            *next
        };
        let now = Timestamp::now();
        let reference = ReferenceNumber::from_backend(format!("GOV-{serial:010}"));
        let response = SubmissionResponse {
            reference_number: reference.clone(),
            status: "submitted".to_string(),
            submitted_at: now,
            timeline: vec![TimelineEntry {
                label: format!("Application submitted for {service}"),
                timestamp: now,
            }],
        };

        let mut apps = Self::locked(self.applications.lock())?;
        apps.insert(
            reference.as_str().to_string(),
            StatusResponse {
                reference_number: reference,
                status: response.status.clone(),
                timeline: response.timeline.clone(),
            },
        );
        // Applicant fields are accepted as given; the stand-in keeps no
        // copy beyond what status lookup needs.
        let _ = fields;
        Ok(response)
    }

    fn search_records(&self, query: &SearchQuery) -> Result<SearchResults, ClientError> {
        let records = Self::locked(self.records.lock())?;
        let matches: Vec<SearchRecord> = records
            .iter()
            .filter(|(record, _)| matches_query(record, query))
            .map(|(record, _)| record.clone())
            .collect();
        Ok(SearchResults {
            total: matches.len(),
            records: matches,
        })
    }

    fn fetch_record_for_download(
        &self,
        identifier: &str,
        date_of_birth: &str,
    ) -> Result<DownloadGrant, ClientError> {
        let records = Self::locked(self.records.lock())?;
        records
            .iter()
            .find(|(record, dob)| record.identifier == identifier && dob == date_of_birth)
            .map(|(record, _)| DownloadGrant {
                record: record.clone(),
                download_url: format!("memory://download/{identifier}"),
                expires_in_secs: 300,
            })
            .ok_or_else(|| ClientError::NotFound {
                reference: identifier.to_string(),
            })
    }

    fn get_status(&self, reference: &ReferenceNumber) -> Result<StatusResponse, ClientError> {
        let apps = Self::locked(self.applications.lock())?;
        apps.get(reference.as_str())
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                reference: reference.as_str().to_string(),
            })
    }
}

/// Case-insensitive match of a record against the queried fields.
///
/// `identifier` must match exactly (ignoring case); `name` matches as a
/// substring; any other queried key must equal the record's detail of
/// the same name. Unknown record fields fail the match rather than
/// silently passing.
fn matches_query(record: &SearchRecord, query: &SearchQuery) -> bool {
    query.fields.iter().all(|(key, value)| {
        let value = value.trim();
        if value.is_empty() {
            return true;
        }
        match key.as_str() {
            "identifier" => record.identifier.eq_ignore_ascii_case(value),
            "name" => record
                .name
                .to_ascii_lowercase()
                .contains(&value.to_ascii_lowercase()),
            other => record
                .details
                .get(other)
                .is_some_and(|detail| detail.eq_ignore_ascii_case(value)),
        }
    })
}

// ─── Unreachable Client ──────────────────────────────────────────────

/// A client for which the backend is always down.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableNetworkClient;

impl UnreachableNetworkClient {
    fn down<T>() -> Result<T, ClientError> {
        Err(ClientError::Transport("backend unreachable".to_string()))
    }
}

impl NetworkClient for UnreachableNetworkClient {
    fn send_otp(&self, _mobile: &MobileNumber) -> Result<(), ClientError> {
        Self::down()
    }

    fn verify_otp(&self, _mobile: &MobileNumber, _code: &str) -> Result<(), ClientError> {
        Self::down()
    }

    fn submit_application(
        &self,
        _service: &ServiceId,
        _fields: &BTreeMap<String, String>,
    ) -> Result<SubmissionResponse, ClientError> {
        Self::down()
    }

    fn search_records(&self, _query: &SearchQuery) -> Result<SearchResults, ClientError> {
        Self::down()
    }

    fn fetch_record_for_download(
        &self,
        _identifier: &str,
        _date_of_birth: &str,
    ) -> Result<DownloadGrant, ClientError> {
        Self::down()
    }

    fn get_status(&self, _reference: &ReferenceNumber) -> Result<StatusResponse, ClientError> {
        Self::down()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
