//! Retry with exponential backoff — the system's only resilience policy.
//!
//! Every failure is retried identically: no jitter, no per-error-type
//! handling. On exhaustion the last failure is propagated unchanged, so
//! callers see exactly one outcome per logical request.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// A reusable retry policy: attempt count plus backoff base.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before attempt i+1 is `base_delay * 2^i`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Build a policy from configuration.
    pub fn from_config(retry: &storyloom_config::RetryConfig) -> Self {
        Self::new(retry.max_attempts, Duration::from_millis(retry.base_delay_ms))
    }

    /// Run `op`, retrying on failure with exponential backoff.
    ///
    /// Sleeps only between attempts; the final failure is returned without
    /// a trailing sleep.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(e);
                    }
                    let delay = self.base_delay * 2u32.pow(attempt - 1);
                    warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Call failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// An operation that fails `failures` times, then succeeds.
    struct Flaky {
        failures: u32,
        calls: Mutex<u32>,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Mutex::new(0),
            }
        }

        async fn call(&self) -> Result<&'static str, String> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.failures {
                Err(format!("boom #{calls}"))
            } else {
                Ok("recovered")
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_first_try_without_sleeping() {
        let op = Flaky::new(0);
        let before = Instant::now();
        let result = RetryPolicy::default().run(|| op.call()).await;
        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(op.calls(), 1);
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn backs_off_exponentially_then_succeeds() {
        let op = Flaky::new(2);
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        let before = Instant::now();
        let result = policy.run(|| op.call()).await;
        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(op.calls(), 3);
        // Two sleeps: 1000ms + 2000ms
        assert_eq!(before.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_surfaces_last_error() {
        let op = Flaky::new(u32::MAX);
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let err = policy.run(|| op.call()).await.unwrap_err();
        assert_eq!(op.calls(), 3);
        // The LAST attempt's failure, unchanged
        assert_eq!(err, "boom #3");
    }

    #[tokio::test(start_paused = true)]
    async fn no_sleep_after_final_failure() {
        let op = Flaky::new(u32::MAX);
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        let before = Instant::now();
        let _ = policy.run(|| op.call()).await;
        // Sleeps only between attempts: 1000ms + 2000ms, nothing after #3
        assert_eq!(before.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_never_sleeps() {
        let op = Flaky::new(u32::MAX);
        let policy = RetryPolicy::new(1, Duration::from_millis(1000));
        let before = Instant::now();
        let err = policy.run(|| op.call()).await.unwrap_err();
        assert_eq!(op.calls(), 1);
        assert_eq!(err, "boom #1");
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[test]
    fn zero_attempts_coerced_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn from_config_reads_knobs() {
        let retry = storyloom_config::RetryConfig {
            max_attempts: 5,
            base_delay_ms: 250,
        };
        let policy = RetryPolicy::from_config(&retry);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
    }
}
