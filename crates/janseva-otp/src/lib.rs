//! # janseva-otp — OTP Lifecycle Management
//!
//! Issues, expires, and verifies the one-time codes that gate the
//! identity-confirmation step of the kiosk workflow.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──send()──▶ Sent ──verify()──▶ Verified (code destroyed)
//!                   │  │
//!                   │  └── expiry passes ──▶ Expired (resend required)
//!                   │
//!                   └──resend()──▶ Sent (after 60s cooldown)
//! ```
//!
//! ## Design Invariants
//!
//! - One active code per session; a second `send()` while a live code
//!   exists is rejected.
//! - Expiry (5 minutes) and resend cooldown (60 seconds) are absolute
//!   timestamps compared lazily against a passed-in clock — no timers.
//! - The local fallback generator only runs when the configuration
//!   explicitly allows offline/demo operation. A production kiosk with
//!   the flag off surfaces the transport failure instead of minting an
//!   unverifiable code.
//! - A verified code is destroyed; it cannot be retrieved or re-verified.

pub mod lifecycle;

pub use lifecycle::{OtpConfig, OtpDelivery, OtpError, OtpIssue, OtpManager, OtpState};
