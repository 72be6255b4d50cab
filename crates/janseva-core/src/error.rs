//! # Error Types — Shared Foundational Errors
//!
//! Defines the errors produced by the foundational types themselves.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! Component-level errors (field validation, OTP lifecycle, network
//! client, workflow orchestration) live in their own crates next to the
//! code that raises them; this module only covers construction failures
//! of the core newtypes.

use thiserror::Error;

/// Errors raised by the foundational types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timestamp string could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An identifier failed its format validation.
    #[error("invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        /// Identifier kind (e.g., "mobile number", "aadhaar number").
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
