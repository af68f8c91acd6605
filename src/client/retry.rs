//! Bounded retry with exponential backoff
//!
//! Wraps a single fallible call and retries transient failures with
//! exponential backoff and jitter. Permanent failures are returned
//! immediately; after the attempt budget is spent the last error is
//! surfaced to the caller, which tags it with the task's target and window.

use crate::client::ApiError;
use crate::config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Jitter added to each backoff delay, as a fraction of the delay
const JITTER_FACTOR: f64 = 0.1;

/// Retry policy for transient API failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            multiplier: config.backoff_multiplier,
        }
    }

    /// Backoff delay before retry number `attempt` (0-based), with jitter
    fn delay_for(&self, attempt: u32) -> Duration {
        let scaled = self.base_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let capped = (scaled as u64).min(self.max_delay.as_millis() as u64);

        let jitter_range = (capped as f64 * JITTER_FACTOR) as u64;
        let jitter = fastrand::u64(0..=jitter_range);

        Duration::from_millis(capped.saturating_add(jitter)).min(self.max_delay)
    }

    /// Runs `operation`, retrying transient errors up to the attempt budget
    pub async fn run<F, Fut, T>(&self, label: &str, operation: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!("{} succeeded on attempt {}", label, attempt + 1);
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !error.is_transient() {
                        tracing::warn!("{} failed permanently: {}", label, error);
                        return Err(error);
                    }

                    attempt += 1;
                    if attempt >= self.max_attempts {
                        tracing::warn!(
                            "{} failed after {} attempts: {}",
                            label,
                            self.max_attempts,
                            error
                        );
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt - 1);
                    tracing::info!(
                        "{} attempt {} of {} failed ({}), retrying in {:?}",
                        label,
                        attempt,
                        self.max_attempts,
                        error,
                        delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}
