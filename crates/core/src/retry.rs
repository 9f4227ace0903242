//! Exponential-backoff retry policy for page and detail fetches.
//!
//! The policy only decides *whether* and *how long*; the fetcher owns the
//! loop and the sleeping.

use std::time::Duration;

use crate::error::FailureKind;

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            multiplier: 2.0,
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Whether a failure of `kind` may be retried at all.
    ///
    /// HTTP failures (including 401) and malformed bodies are final.
    pub fn retries(&self, kind: FailureKind) -> bool {
        kind.is_transient()
    }

    /// Delay to wait after failed attempt number `attempt` (1-based), or
    /// `None` when the failure must be surfaced instead.
    pub fn delay_after(&self, attempt: u32, kind: FailureKind) -> Option<Duration> {
        if attempt >= self.max_attempts || !self.retries(kind) {
            return None;
        }
        let mut delay = self.base_delay.min(self.max_delay);
        for _ in 1..attempt {
            delay = next_delay(delay, self);
        }
        Some(delay)
    }
}

/// Calculate the next backoff delay from the current delay and policy.
///
/// The result is clamped to [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
