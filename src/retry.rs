//! Exponential-backoff retry policy for the send path
//!
//! Modeled as an explicit strategy object rather than a decorator: the policy
//! carries the backoff schedule and optional attempt cap, and [`RetryPolicy::run`]
//! composes it around an operation together with an error predicate deciding
//! which failures are worth another attempt.

use crate::PublishError;
use std::future::Future;
use std::time::Duration;

/// Backoff schedule and attempt budget for retried operations
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub base_delay: Duration,

    /// Exponential backoff multiplier applied per retry
    pub multiplier: f64,

    /// Maximum delay cap
    pub max_delay: Duration,

    /// Maximum total attempts; `None` retries indefinitely
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Cap the number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the initial retry delay
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `retry_index` (zero-based).
    ///
    /// Grows exponentially from `base_delay` and saturates at `max_delay`.
    /// The schedule is clamped to `[0, max_delay]` so a degenerate multiplier
    /// can never produce a negative or non-finite duration.
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let factor = self.multiplier.powi(retry_index.min(31) as i32);
        let delay_secs = self.base_delay.as_secs_f64() * factor;
        if !delay_secs.is_finite() {
            return self.max_delay;
        }
        Duration::from_secs_f64(delay_secs.clamp(0.0, self.max_delay.as_secs_f64()))
    }

    /// Run `op`, retrying while `should_retry` accepts the error and the
    /// attempt budget allows.
    ///
    /// The backoff sleep is a suspension point; concurrent sends on the same
    /// publisher are not blocked by a retrying call. Errors the predicate
    /// rejects propagate immediately, unchanged.
    pub async fn run<T, F, Fut, P>(&self, should_retry: P, mut op: F) -> Result<T, PublishError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PublishError>>,
        P: Fn(&PublishError) -> bool,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if should_retry(&e) => {
                    if self.max_attempts.is_some_and(|max| attempt >= max) {
                        tracing::error!(
                            "Giving up after {} attempts: {}",
                            attempt,
                            e
                        );
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt - 1);
                    tracing::warn!(
                        "Attempt {} failed: {}, retrying in {:?}",
                        attempt,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
