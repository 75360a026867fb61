//! Linear backoff between retry attempts.

use std::time::Duration;

/// Delay before the next attempt.
///
/// `attempts_remaining` is the number of attempts still allowed after the one
/// that just failed, so the first retry of a `retries = 4` budget waits
/// `backoff_ms * 0`, the second `backoff_ms * 1` and so on.
pub fn linear_backoff(backoff_ms: u64, retries: u32, attempts_remaining: u32) -> Duration {
    let attempts_made = retries.saturating_sub(attempts_remaining.saturating_add(1));
    Duration::from_millis(backoff_ms.saturating_mul(u64::from(attempts_made)))
}
