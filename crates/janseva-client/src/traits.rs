//! # NetworkClient Trait
//!
//! The abstract interface to the government backend. The workflow engine
//! depends only on this trait; which transport (if any) sits behind it
//! is an implementation concern.
//!
//! The trait requires `Send + Sync` so one client can serve sessions on
//! whatever thread the kiosk shell runs them on. Calls are blocking from
//! the caller's point of view; the workflow disables the triggering
//! control while one is outstanding.

use std::collections::BTreeMap;

use thiserror::Error;

use janseva_core::{MobileNumber, ReferenceNumber, ServiceId};

use crate::messages::{
    DownloadGrant, SearchQuery, SearchResults, StatusResponse, SubmissionResponse,
};

/// Error from a backend operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The backend could not be reached or answered garbage.
    ///
    /// The workflow absorbs this via its fallback paths (when offline
    /// mode permits) — it is never shown to the citizen as-is.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The entered OTP code was rejected by the backend.
    #[error("the entered code is not valid")]
    InvalidCode,

    /// No record matched the queried identifier.
    #[error("no record found for {reference}")]
    NotFound {
        /// The queried identifier, echoed for display.
        reference: String,
    },
}

/// Abstract interface to the government service backend.
pub trait NetworkClient: Send + Sync {
    /// Ask the backend to send an OTP to `mobile`.
    ///
    /// # Errors
    ///
    /// Any error triggers the engine's local fallback generator (when
    /// offline mode permits).
    fn send_otp(&self, mobile: &MobileNumber) -> Result<(), ClientError>;

    /// Ask the backend to verify an OTP it issued.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidCode`] when the code does not match.
    fn verify_otp(&self, mobile: &MobileNumber, code: &str) -> Result<(), ClientError>;

    /// Submit a normalized application payload.
    ///
    /// # Errors
    ///
    /// Any error triggers the engine's local fallback record (when
    /// offline mode permits).
    fn submit_application(
        &self,
        service: &ServiceId,
        fields: &BTreeMap<String, String>,
    ) -> Result<SubmissionResponse, ClientError>;

    /// Search records by the given query fields.
    ///
    /// # Errors
    ///
    /// [`ClientError::Transport`] on backend failure.
    fn search_records(&self, query: &SearchQuery) -> Result<SearchResults, ClientError>;

    /// Fetch a record and a short-lived download grant.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] when identifier and date of birth do
    /// not match a record.
    fn fetch_record_for_download(
        &self,
        identifier: &str,
        date_of_birth: &str,
    ) -> Result<DownloadGrant, ClientError>;

    /// Look up the processing status of a submitted application.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] when the reference number is unknown.
    fn get_status(&self, reference: &ReferenceNumber) -> Result<StatusResponse, ClientError>;
}
