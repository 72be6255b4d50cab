//! # janseva-workflow — The Kiosk Workflow Engine
//!
//! Orchestrates the OTP-gated, multi-step application workflow of the
//! JanSeva kiosk: service selection, form entry, document attestation,
//! OTP verification, review, and submission to a reference-numbered
//! receipt — plus the lookup flows (record search, document download,
//! status check) that skip OTP and review.
//!
//! ## Components
//!
//! - **Session** (`session.rs`): the mutable per-interaction state,
//!   owned exclusively by the state machine, exposed to the rendering
//!   surface only as a read-only snapshot.
//!
//! - **ApplicationStateMachine** (`machine.rs`): the single entry point
//!   for the rendering surface. Sequences the steps of the selected
//!   [`ServiceDefinition`], re-running gating on every forward
//!   transition; backward transitions are unconditional.
//!
//! - **SubmissionGateway** (`submission.rs`): normalizes the form
//!   payload, submits through the [`NetworkClient`], and — only in
//!   offline/demo mode — fabricates a plausible local record when the
//!   backend is down.
//!
//! - **StatusTracker** (`status.rs`): maps raw backend status codes to
//!   bilingual presentation descriptors, passing unknown codes through
//!   with a neutral color tag.
//!
//! - **Catalog** (`catalog.rs`): the built-in service definitions,
//!   shipped as immutable configuration.
//!
//! ## Fallback Policy
//!
//! Backend unavailability never blocks a citizen mid-flow when
//! [`WorkflowConfig::offline_demo`] is enabled: OTP send falls back to a
//! locally generated code (surfaced through the info banner), and
//! submission falls back to a locally fabricated record with a
//! service-prefixed reference number. With the flag off, transport
//! failures surface as error banners and the step stays put.
//!
//! [`NetworkClient`]: janseva_client::NetworkClient
//! [`ServiceDefinition`]: janseva_core::ServiceDefinition

pub mod catalog;
pub mod machine;
pub mod session;
pub mod status;
pub mod submission;

pub use catalog::builtin_services;
pub use machine::{ApplicationStateMachine, WorkflowConfig, WorkflowError};
pub use session::{
    ApplicationRecord, Banner, Session, SessionResult, SessionSnapshot, Severity,
};
pub use status::{ApplicationStatus, ColorTag, StatusDescriptor, StatusResult, StatusTracker};
pub use submission::{SubmissionError, SubmissionGateway, SubmissionOutcome};
