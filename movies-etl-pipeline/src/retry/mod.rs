//! Retry policy with exponential backoff.
//!
//! A policy knows nothing about the operations it wraps: callers pass the
//! operation and a predicate selecting which failures are worth retrying.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

/// Exponential backoff policy.
///
/// Up to `max_attempts` guarded attempts are made. A failure accepted by the
/// caller's predicate is logged and slept on; the delay starts at
/// `initial_delay` and is multiplied by `multiplier` after each attempt, never
/// exceeding `max_delay`. Once the guarded attempts are used up, one final
/// attempt runs unguarded and its result is returned as is.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of guarded attempts before the final one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each failed attempt.
    pub multiplier: u32,
    /// Ceiling for the delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            initial_delay: Duration::from_secs(2),
            multiplier: 2,
            max_delay: Duration::from_secs(256),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default multiplier and ceiling.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            ..Default::default()
        }
    }

    /// Set the backoff multiplier.
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the delay ceiling.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// The delays slept after each guarded attempt, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let max_delay = self.max_delay;
        let multiplier = self.multiplier;

        std::iter::successors(Some(self.initial_delay.min(max_delay)), move |delay| {
            Some(delay.saturating_mul(multiplier).min(max_delay))
        })
        .take(self.max_attempts as usize)
    }

    /// Run `op`, retrying failures for which `retry_on` returns true.
    ///
    /// # Arguments
    ///
    /// * `operation` - Name used in log records
    /// * `retry_on` - Selects the failure class that is retried; other
    ///   failures are returned immediately
    /// * `op` - Produces a fresh attempt each time it is called
    pub async fn run<T, E, F, Fut, P>(&self, operation: &str, retry_on: P, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 0;

        for delay in self.delays() {
            attempt += 1;

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(operation = %operation, attempt = attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if retry_on(&e) => {
                    warn!(
                        operation = %operation,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        op().await
    }
}
