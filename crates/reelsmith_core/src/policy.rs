//! Retry and poll policies injected into generators.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded attempts with linearly increasing backoff.
///
/// # Examples
///
/// ```
/// use reelsmith_core::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(5, Duration::from_secs(10));
/// assert_eq!(policy.delay_after(1), Duration::from_secs(10));
/// assert_eq!(policy.delay_after(3), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Total attempts including the first
    max_attempts: u32,
    /// Backoff unit; the wait after attempt `n` is `n * backoff_step`
    backoff_step: Duration,
}

impl RetryPolicy {
    /// Create a policy. A zero attempt cap is raised to one.
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_step,
        }
    }

    /// Wait before the attempt following `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }

    /// True if another attempt may follow `attempt` (1-based).
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Fixed-interval polling with a hard cap on polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PollPolicy {
    /// Wait before each status check
    interval: Duration,
    /// Status checks before giving up
    max_polls: u32,
    /// Extra wait after a failed status check
    error_pause: Duration,
}

impl PollPolicy {
    /// Create a policy. A zero poll cap is raised to one.
    pub fn new(interval: Duration, max_polls: u32, error_pause: Duration) -> Self {
        Self {
            interval,
            max_polls: max_polls.max(1),
            error_pause,
        }
    }

    /// Wall-clock budget implied by the poll cap.
    pub fn timeout(&self) -> Duration {
        self.interval * self.max_polls
    }
}
