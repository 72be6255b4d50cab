//! # Backend Message Types
//!
//! Request and response shapes for the [`NetworkClient`] operations.
//! These are the logical contract of the boundary — no wire format is
//! fixed here.
//!
//! [`NetworkClient`]: crate::traits::NetworkClient

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use janseva_core::{ReferenceNumber, Timestamp};

/// One entry of an application's processing timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// What happened (e.g., "Application submitted").
    pub label: String,
    /// When it happened.
    pub timestamp: Timestamp,
}

/// Response to a successful application submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    /// Reference number minted by the backend.
    pub reference_number: ReferenceNumber,
    /// Raw status code (normally `submitted`).
    pub status: String,
    /// When the backend recorded the submission.
    pub submitted_at: Timestamp,
    /// Initial timeline (empty or a single submission entry).
    pub timeline: Vec<TimelineEntry>,
}

/// A record search query: field key → queried value.
///
/// Which keys are meaningful is a backend concern; the kiosk forwards
/// the search step's form values as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Queried fields.
    pub fields: BTreeMap<String, String>,
}

/// One matched record from a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Backend identifier of the record (e.g., an EPIC number).
    pub identifier: String,
    /// Holder name as registered.
    pub name: String,
    /// Additional display fields (relation name, booth, district, ...).
    pub details: BTreeMap<String, String>,
}

/// Result set of a record search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Total matches known to the backend.
    pub total: usize,
    /// The returned page of records.
    pub records: Vec<SearchRecord>,
}

/// A short-lived grant to download a document copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadGrant {
    /// The record the grant is for.
    pub record: SearchRecord,
    /// Where the rendering surface can fetch the document.
    pub download_url: String,
    /// Seconds until the URL expires.
    pub expires_in_secs: u32,
}

/// Response to a status lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// The queried reference number, echoed back.
    pub reference_number: ReferenceNumber,
    /// Raw status code (see the workflow status table for known codes).
    pub status: String,
    /// Processing timeline, oldest first.
    pub timeline: Vec<TimelineEntry>,
}

// ─── Tests ───────────────────────────────────────────────────────────
