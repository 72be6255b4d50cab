//! # Temporal Types — UTC Timestamps and the Clock Boundary
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds
//! precision, and the [`Clock`] trait through which all workflow code
//! observes the current time.
//!
//! ## Design Invariant
//!
//! Nothing in the stack runs a countdown timer. OTP expiry and resend
//! cooldowns are stored as absolute `Timestamp` fields on the session and
//! compared lazily against `clock.now()` at the moment of use. This keeps
//! session teardown trivial (no timers to cancel) and makes expiry
//! behavior testable with a [`ManualClock`] instead of fake timers.
//!
//! ## Format
//!
//! Receipts and timeline entries render timestamps as ISO8601 with `Z`
//! suffix (`YYYY-MM-DDTHH:MM:SSZ`) — no sub-seconds, no `+00:00` offsets.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, converting to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string, converting any timezone
    /// offset to UTC.
    ///
    /// Backend responses may carry offsets (`+05:30` is common for IST);
    /// the result is always UTC with seconds precision.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTimestamp`] if the string is not valid
    /// RFC 3339.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| CoreError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| CoreError::InvalidTimestamp {
            value: secs.to_string(),
            reason: "out of range for a Unix timestamp".to_string(),
        })?;
        Ok(Self(dt))
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns this timestamp shifted forward by `secs` seconds.
    ///
    /// Saturates at the representable range rather than panicking; OTP
    /// TTLs and cooldowns are far from the chrono bounds in practice.
    pub fn plus_secs(&self, secs: i64) -> Self {
        match self.0.checked_add_signed(chrono::Duration::seconds(secs)) {
            Some(dt) => Self(dt),
            None => *self,
        }
    }

    /// Whole seconds from `self` until `later` (negative if `later` is
    /// in the past). Used to report remaining cooldown time.
    pub fn seconds_until(&self, later: Timestamp) -> i64 {
        later.0.signed_duration_since(self.0).num_seconds()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clock Boundary ──────────────────────────────────────────────────

/// Source of the current time for workflow code.
///
/// Production code uses [`SystemClock`]; tests use [`ManualClock`] to
/// step time past OTP expiry and cooldown boundaries deterministically.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock implementation of [`Clock`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a manual clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: std::sync::Mutex::new(start),
        }
    }

    /// Advance the clock by `secs` seconds.
    pub fn advance_secs(&self, secs: i64) {
        if let Ok(mut now) = self.now.lock() {
            *now = now.plus_secs(secs);
        }
    }

    /// Jump the clock to an absolute time.
    pub fn set(&self, ts: Timestamp) {
        if let Ok(mut now) = self.now.lock() {
            *now = ts;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert!(ts.to_iso8601().ends_with('Z'));
        assert_eq!(ts, Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap());
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let with_nanos = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(with_nanos);
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_parse_converts_ist_offset() {
        let ts = Timestamp::parse("2026-01-15T17:30:00+05:30").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-01-15").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_plus_secs_and_seconds_until() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let later = ts.plus_secs(300);
        assert_eq!(later.to_iso8601(), "2026-01-15T12:05:00Z");
        assert_eq!(ts.seconds_until(later), 300);
        assert_eq!(later.seconds_until(ts), -300);
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let later = Timestamp::parse("2026-01-15T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    // ---- clocks ----

    #[test]
    fn test_manual_clock_advances() {
        let start = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        clock.advance_secs(61);
        assert_eq!(clock.now(), start.plus_secs(61));
    }

    #[test]
    fn test_manual_clock_set() {
        let start = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let clock = ManualClock::new(start);
        let jump = start.plus_secs(3600);
        clock.set(jump);
        assert_eq!(clock.now(), jump);
    }

    #[test]
    fn test_system_clock_is_utc_seconds() {
        let ts = SystemClock.now();
        assert_eq!(ts, Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap());
    }
}
