//! # janseva-cli — Kiosk Workflow Command-Line Interface
//!
//! Operator tooling for the JanSeva workflow stack. No kiosk UI lives
//! here; the CLI drives the same engine a kiosk front-end would, against
//! the bundled backend stand-ins, so flows can be exercised and demoed
//! from a terminal.
//!
//! ## Subcommands
//!
//! - `catalog` — List the built-in service catalog
//! - `demo` — Walk a complete flow end to end, printing each transition
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no workflow logic here.

pub mod catalog;
pub mod demo;
