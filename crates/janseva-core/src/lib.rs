//! # janseva-core — Foundational Types for the JanSeva Kiosk Stack
//!
//! This crate is the bedrock of the JanSeva workflow stack. It defines the
//! primitives every other crate builds on: UTC-only timestamps with a
//! pluggable clock, validated identifier newtypes, and the immutable
//! service-catalog configuration types that drive the step sequencer.
//! Every other crate in the workspace depends on `janseva-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ServiceId`, `SessionId`,
//!    `MobileNumber`, `AadhaarNumber`, `ReferenceNumber` — all newtypes with
//!    validated constructors. No bare strings for identifiers.
//!
//! 2. **UTC-only timestamps, lazily compared.** The `Timestamp` type is UTC
//!    with seconds precision. OTP expiry and resend cooldowns are evaluated
//!    by comparing timestamps at the moment of use against a passed-in
//!    [`Clock`] — there are no background timers anywhere in the stack.
//!
//! 3. **Service definitions are data, not code.** Which steps a service
//!    walks through, which fields each step collects, and which documents
//!    must be attested are all carried by [`ServiceDefinition`], selected
//!    once when a session starts and immutable thereafter.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `janseva-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross the snapshot boundary.

pub mod error;
pub mod identity;
pub mod service;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use identity::{AadhaarNumber, MobileNumber, ReferenceNumber, ServiceId, SessionId};
pub use service::{
    DocumentSpec, FieldFormat, FieldSpec, LookupKind, ServiceDefinition, StepKind, StepSpec,
};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
