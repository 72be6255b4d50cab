//! # janseva-validate — Pure Form Validators
//!
//! Stateless validation for the kiosk workflow: per-field required-ness
//! and format checks (`fields`), and the document-availability checklist
//! gate (`documents`).
//!
//! ## Design
//!
//! Both validators are pure functions over their inputs. They are safe to
//! call on every keystroke, but the workflow calls them only when the
//! citizen tries to leave a step — interim errors on half-typed fields
//! are noise on a touchscreen.

pub mod documents;
pub mod fields;

pub use documents::{all_required_attested, missing_documents};
pub use fields::{validate, ErrorMap, FieldError};
