//! Retry classification and call budget.
//!
//! # Responsibilities
//! - Decide whether an error message names a transient failure
//! - Track how many attempts a single call may make
//! - Compute the wait before the next attempt

use std::time::Duration;

use crate::config::schema::TargetSettings;
use crate::resilience::backoff::linear_backoff;

/// Error codes that indicate a transient failure.
pub const RETRYABLE_CODES: [&str; 4] = [
    "ECONNRESET",
    "ESOCKETTIMEDOUT",
    "ETIMEDOUT",
    "SSS_REQUEST_LIMIT_EXCEEDED",
];

/// Total attempts when `retries` is not configured.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Returns true if the message contains any of the retryable codes.
///
/// Containment rather than equality, so transport messages such as
/// `"read ECONNRESET"` still qualify.
pub fn is_retryable(message: &str) -> bool {
    RETRYABLE_CODES.iter().any(|code| message.contains(code))
}

/// Per-link retry settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first, when configured.
    pub retries: Option<u32>,
    /// Backoff unit in milliseconds, when configured.
    pub backoff_ms: Option<u64>,
}

impl RetryPolicy {
    pub fn new(retries: Option<u32>, backoff_ms: Option<u64>) -> Self {
        Self { retries, backoff_ms }
    }

    pub fn from_settings(settings: &TargetSettings) -> Self {
        Self::new(settings.retries, settings.backoff)
    }

    /// Total attempts a call may make. Always at least one.
    pub fn max_attempts(&self) -> u32 {
        self.retries.unwrap_or(DEFAULT_ATTEMPTS).max(1)
    }

    /// Wait before retrying, or `None` to retry immediately.
    ///
    /// Both knobs must be set and non-zero for a delay to apply.
    pub fn delay_before_retry(&self, attempts_remaining: u32) -> Option<Duration> {
        match (self.retries, self.backoff_ms) {
            (Some(retries), Some(backoff_ms)) if retries > 0 && backoff_ms > 0 => {
                Some(linear_backoff(backoff_ms, retries, attempts_remaining))
            }
            _ => None,
        }
    }
}
