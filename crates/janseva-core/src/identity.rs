//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers that flow through the kiosk
//! workflow. These prevent accidental identifier confusion — you cannot
//! pass a `MobileNumber` where a `ReferenceNumber` is expected.
//!
//! Identifiers citizens type at the kiosk (`MobileNumber`,
//! `AadhaarNumber`) have validated constructors that normalize the
//! whitespace touchscreen keyboards tend to insert. Identifiers the
//! system mints (`SessionId`, `ReferenceNumber`) carry their generation
//! logic here so every crate mints them the same way.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::temporal::Timestamp;

/// Identifier for an offered service (e.g., `voter-new-registration`).
///
/// Service ids are catalog keys, not user input; any non-empty string
/// is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

impl ServiceId {
    /// Wrap a catalog key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The catalog key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for one citizen interaction at the kiosk.
///
/// Used by the stale-response guard: a network result is applied only if
/// the session it was issued for is still the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An Indian mobile number: exactly 10 digits after whitespace is stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Parse and normalize a mobile number.
    ///
    /// Strips all whitespace, then requires exactly 10 ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentifier`] on any other shape.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(digits))
        } else {
            Err(CoreError::InvalidIdentifier {
                kind: "mobile number",
                value: raw.to_string(),
                reason: "expected exactly 10 digits".to_string(),
            })
        }
    }

    /// The normalized digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked rendering for receipts and logs (`XXXXXX3210`).
    pub fn masked(&self) -> String {
        format!("XXXXXX{}", &self.0[6..])
    }
}

impl std::fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An Aadhaar number: exactly 12 digits after whitespace is stripped.
///
/// Citizens commonly type the printed `XXXX XXXX XXXX` grouping; the
/// constructor accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AadhaarNumber(String);

impl AadhaarNumber {
    /// Parse and normalize an Aadhaar number.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentifier`] unless the input is
    /// exactly 12 digits once whitespace is removed.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() == 12 && digits.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(digits))
        } else {
            Err(CoreError::InvalidIdentifier {
                kind: "aadhaar number",
                value: raw.to_string(),
                reason: "expected exactly 12 digits".to_string(),
            })
        }
    }

    /// The normalized digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reference number assigned to a submitted application, used for later
/// status lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    /// Wrap a reference number returned by the backend.
    pub fn from_backend(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Fabricate a reference number locally (disconnected/demo operation).
    ///
    /// Shape: `<PREFIX>-<epoch seconds><4 random digits>`. The time
    /// component plus random suffix makes same-second collisions across
    /// kiosks unlikely; the prefix tags the record family (registration
    /// vs. correction vs. PVC order) so status lookups can disambiguate.
    pub fn generate(prefix: &str, now: Timestamp) -> Self {
        let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
        Self(format!("{prefix}-{}{suffix:04}", now.epoch_secs()))
    }

    /// The reference number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference carries the given family prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl std::fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
