//! # OTP Lifecycle Manager
//!
//! Owns the single outstanding OTP of a session: network-first send with
//! a gated local fallback generator, wall-clock expiry, resend cooldown,
//! and verify-once semantics.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use janseva_client::{ClientError, NetworkClient};
use janseva_core::{MobileNumber, Timestamp};

// ─── Configuration ───────────────────────────────────────────────────

/// Tunables for the OTP lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Seconds a code stays valid after issue.
    pub ttl_secs: i64,
    /// Seconds before a resend is permitted.
    pub resend_cooldown_secs: i64,
    /// Whether a failed backend send may fall back to a locally
    /// generated code. Must stay off outside demo/disconnected kiosks:
    /// a transient network blip must not silently accept an unverified
    /// citizen.
    pub allow_offline_fallback: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            resend_cooldown_secs: 60,
            allow_offline_fallback: false,
        }
    }
}

impl OtpConfig {
    /// Configuration for demo/disconnected operation: fallback enabled.
    pub fn offline_demo() -> Self {
        Self {
            allow_offline_fallback: true,
            ..Self::default()
        }
    }
}

// ─── State ───────────────────────────────────────────────────────────

/// How the outstanding code was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpDelivery {
    /// The backend sent the code to the citizen's phone.
    Network,
    /// The code was generated locally (offline/demo operation).
    LocalFallback,
}

/// The outstanding one-time code of a session.
///
/// The code itself is private: for network delivery it is never known
/// locally, and for fallback delivery it is handed out exactly once in
/// the [`OtpIssue`] and is not retrievable afterwards.
#[derive(Debug, Clone)]
pub struct OtpState {
    mobile: MobileNumber,
    /// Locally generated code; `None` for network delivery.
    code: Option<String>,
    delivery: OtpDelivery,
    issued_at: Timestamp,
    expires_at: Timestamp,
    cooldown_until: Timestamp,
}

impl OtpState {
    /// The mobile number the code was issued for.
    pub fn mobile(&self) -> &MobileNumber {
        &self.mobile
    }

    /// How the code was delivered.
    pub fn delivery(&self) -> OtpDelivery {
        self.delivery
    }

    /// When the code was issued.
    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    /// When the code stops being accepted.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// When a resend becomes permitted.
    pub fn cooldown_until(&self) -> Timestamp {
        self.cooldown_until
    }

    fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }
}

/// Outcome of a successful `send()`/`resend()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpIssue {
    /// How the code reached (or will reach) the citizen.
    pub delivery: OtpDelivery,
    /// The locally generated code, present only for fallback delivery.
    /// The workflow surfaces it through the info banner; it is not
    /// retrievable from the manager afterwards.
    pub fallback_code: Option<String>,
    /// When the code expires.
    pub expires_at: Timestamp,
    /// When a resend becomes permitted.
    pub cooldown_until: Timestamp,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from OTP lifecycle operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// No code is outstanding (send not yet requested, or the code was
    /// already consumed by a successful verification).
    #[error("no one-time code is outstanding for this session")]
    NotFound,

    /// The outstanding code has expired.
    #[error("the one-time code has expired; request a new one")]
    CodeExpired,

    /// The entered code does not match.
    #[error("the entered code does not match")]
    CodeMismatch,

    /// Resend requested before the cooldown elapsed.
    #[error("please wait {remaining_secs}s before requesting a new code")]
    Cooldown {
        /// Whole seconds until resend is permitted.
        remaining_secs: i64,
    },

    /// A live code already exists; it must expire or be verified first.
    #[error("a code was already sent; it is valid for another {expires_in_secs}s")]
    AlreadyActive {
        /// Whole seconds until the outstanding code expires.
        expires_in_secs: i64,
    },

    /// The backend failed and offline fallback is not permitted.
    #[error("could not reach the verification service: {reason}")]
    Transport {
        /// Underlying transport failure.
        reason: String,
    },
}

// ─── Manager ─────────────────────────────────────────────────────────

/// Per-session OTP manager.
///
/// Created alongside the session, destroyed with it. Holds at most one
/// [`OtpState`] plus the sticky `verified` flag the submission gateway
/// checks.
#[derive(Debug, Default)]
pub struct OtpManager {
    config: OtpConfig,
    state: Option<OtpState>,
    verified: bool,
}

impl OtpManager {
    /// A manager with the given configuration and no outstanding code.
    pub fn new(config: OtpConfig) -> Self {
        Self {
            config,
            state: None,
            verified: false,
        }
    }

    /// Whether a code has been successfully verified this session.
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// The outstanding code's state, if any (never exposes the code).
    pub fn state(&self) -> Option<&OtpState> {
        self.state.as_ref()
    }

    /// Issue a code for `mobile`.
    ///
    /// Rejects with [`OtpError::AlreadyActive`] while a non-expired code
    /// is outstanding. Restarts the verification cycle: a previously
    /// verified flag is cleared.
    ///
    /// # Errors
    ///
    /// [`OtpError::Transport`] when the backend send fails and offline
    /// fallback is disabled.
    pub fn send(
        &mut self,
        client: &dyn NetworkClient,
        mobile: &MobileNumber,
        now: Timestamp,
    ) -> Result<OtpIssue, OtpError> {
        if let Some(state) = &self.state {
            if !state.is_expired(now) {
                return Err(OtpError::AlreadyActive {
                    expires_in_secs: now.seconds_until(state.expires_at),
                });
            }
        }
        self.verified = false;
        self.issue(client, mobile.clone(), now)
    }

    /// Re-issue a code to the same mobile number.
    ///
    /// # Errors
    ///
    /// - [`OtpError::NotFound`] when no code was ever sent.
    /// - [`OtpError::Cooldown`] until 60 seconds after the last issue.
    /// - [`OtpError::Transport`] as for [`send`](Self::send).
    pub fn resend(
        &mut self,
        client: &dyn NetworkClient,
        now: Timestamp,
    ) -> Result<OtpIssue, OtpError> {
        let Some(state) = &self.state else {
            return Err(OtpError::NotFound);
        };
        if now < state.cooldown_until {
            return Err(OtpError::Cooldown {
                remaining_secs: now.seconds_until(state.cooldown_until),
            });
        }
        let mobile = state.mobile.clone();
        self.issue(client, mobile, now)
    }

    /// Verify an entered code against the outstanding one.
    ///
    /// Comparison trims surrounding whitespace only. On success the
    /// code is destroyed and the manager stays `verified` until reset;
    /// a second call then fails with [`OtpError::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`OtpError::NotFound`] with no outstanding code.
    /// - [`OtpError::CodeExpired`] past the TTL, regardless of the
    ///   entered value.
    /// - [`OtpError::CodeMismatch`] on a wrong code.
    /// - [`OtpError::Transport`] when a network-delivered code cannot
    ///   be checked because the backend is down.
    pub fn verify(
        &mut self,
        client: &dyn NetworkClient,
        entered: &str,
        now: Timestamp,
    ) -> Result<(), OtpError> {
        let Some(state) = &self.state else {
            return Err(OtpError::NotFound);
        };
        if state.is_expired(now) {
            return Err(OtpError::CodeExpired);
        }

        let entered = entered.trim();
        match (&state.code, state.delivery) {
            (Some(stored), OtpDelivery::LocalFallback) => {
                if stored != entered {
                    return Err(OtpError::CodeMismatch);
                }
            }
            _ => {
                client
                    .verify_otp(&state.mobile, entered)
                    .map_err(|e| match e {
                        ClientError::InvalidCode => OtpError::CodeMismatch,
                        other => OtpError::Transport {
                            reason: other.to_string(),
                        },
                    })?;
            }
        }

        // Verified: destroy the code, keep only the flag.
        self.state = None;
        self.verified = true;
        Ok(())
    }

    /// Drop any outstanding code and the verified flag (session reset).
    pub fn reset(&mut self) {
        self.state = None;
        self.verified = false;
    }

    fn issue(
        &mut self,
        client: &dyn NetworkClient,
        mobile: MobileNumber,
        now: Timestamp,
    ) -> Result<OtpIssue, OtpError> {
        let (delivery, code) = match client.send_otp(&mobile) {
            Ok(()) => (OtpDelivery::Network, None),
            Err(e) if self.config.allow_offline_fallback => {
                let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
                tracing::warn!(
                    mobile = %mobile.masked(),
                    error = %e,
                    "backend OTP send failed; using local fallback code"
                );
                (OtpDelivery::LocalFallback, Some(code))
            }
            Err(e) => {
                return Err(OtpError::Transport {
                    reason: e.to_string(),
                })
            }
        };

        let state = OtpState {
            mobile,
            code: code.clone(),
            delivery,
            issued_at: now,
            expires_at: now.plus_secs(self.config.ttl_secs),
            cooldown_until: now.plus_secs(self.config.resend_cooldown_secs),
        };
        let issue = OtpIssue {
            delivery,
            fallback_code: code,
            expires_at: state.expires_at,
            cooldown_until: state.cooldown_until,
        };
        self.state = Some(state);
        Ok(issue)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
