//! Timeout plus bounded exponential back-off for persistence calls.
//!
//! Each attempt runs under a hard deadline. A timed-out attempt is dropped,
//! so any late completion is never observed. Only the failure classes in
//! [`WriteError::is_retryable`] are retried; anything else is returned at
//! once without consuming retry budget.

use std::future::Future;
use std::time::Duration;

use loofind_core::AppConfig;

use crate::error::WriteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_retries: 3,
            backoff_base: Duration::from_millis(1_000),
            backoff_cap: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.write_timeout_ms),
            max_retries: config.write_max_retries,
            backoff_base: Duration::from_millis(config.write_backoff_base_ms),
            backoff_cap: Duration::from_millis(config.write_backoff_cap_ms),
        }
    }

    /// Sleep before retry number `attempt + 1`: `min(base * 2^attempt, cap)`.
    ///
    /// | Attempt | Delay (defaults) |
    /// |---------|------------------|
    /// | 0       | 1 000 ms         |
    /// | 1       | 2 000 ms         |
    /// | 2       | 4 000 ms         |
    /// | 3       | 8 000 ms         |
    /// | 4+      | 10 000 ms (cap)  |
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff_base
            .saturating_mul(factor)
            .min(self.backoff_cap)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `operation` with up to `max_retries` additional attempts.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once every
    /// retry has been used. An attempt that outlives the timeout fails with
    /// [`WriteError::Timeout`].
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, WriteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, WriteError>>,
    {
        let max_retries = self.policy.max_retries;
        let mut attempt = 0u32;
        loop {
            let err = match tokio::time::timeout(self.policy.timeout, operation()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => err,
                Err(_) => WriteError::Timeout {
                    after_ms: u64::try_from(self.policy.timeout.as_millis()).unwrap_or(u64::MAX),
                },
            };
            if !err.is_retryable() || attempt >= max_retries {
                return Err(err);
            }

            let delay = self.policy.delay_for_attempt(attempt);
            attempt += 1;
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(
                attempt,
                max_retries,
                delay_ms,
                error = %err,
                "transient write error; retrying after back-off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn network() -> WriteError {
        WriteError::TransientNetwork("connection reset".to_owned())
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (0..6)
            .map(|a| u64::try_from(policy.delay_for_attempt(a).as_millis()).unwrap())
            .collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 10_000, 10_000]);
        assert_eq!(policy.delay_for_attempt(40), Duration::from_millis(10_000));
    }

    #[test]
    fn policy_from_app_config() {
        let app = AppConfig {
            write_timeout_ms: 500,
            write_max_retries: 1,
            write_backoff_base_ms: 10,
            write_backoff_cap_ms: 40,
            ..AppConfig::default()
        };
        assert_eq!(
            RetryPolicy::from_app_config(&app),
            RetryPolicy {
                timeout: Duration::from_millis(500),
                max_retries: 1,
                backoff_base: Duration::from_millis(10),
                backoff_cap: Duration::from_millis(40),
            }
        );
        assert_eq!(
            RetryPolicy::from_app_config(&AppConfig::default()),
            RetryPolicy::default()
        );
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryExecutor::default()
            .execute(|| {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, WriteError>(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_then_succeeds_with_growing_delays() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::new(Mutex::new(Vec::<Instant>::new()));
        let (c, s) = (Arc::clone(&calls), Arc::clone(&seen));
        let result = RetryExecutor::default()
            .execute(|| {
                let (c, s) = (Arc::clone(&c), Arc::clone(&s));
                async move {
                    s.lock().unwrap().push(Instant::now());
                    let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt <= 3 {
                        Err(network())
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 4, "fourth attempt succeeds");

        let seen = seen.lock().unwrap();
        let gaps: Vec<Duration> = seen.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(
            gaps,
            vec![
                Duration::from_millis(1_000),
                Duration::from_millis(2_000),
                Duration::from_millis(4_000)
            ]
        );
        assert!(gaps.windows(2).all(|w| w[0] <= w[1]));
        assert!(gaps.iter().all(|g| *g <= Duration::from_millis(10_000)));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausting_retries_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryExecutor::default()
            .execute(|| {
                let c = Arc::clone(&c);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(WriteError::TransientNetwork(format!("failure {n}")))
                }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4, "1 try + 3 retries");
        assert!(matches!(result, Err(WriteError::TransientNetwork(msg)) if msg == "failure 3"));
    }

    #[tokio::test]
    async fn does_not_retry_non_retryable_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryExecutor::default()
            .execute(|| {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(WriteError::NotFound("entry 17".to_owned()))
                }
            })
            .await;
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "NotFound must not be retried"
        );
        assert!(matches!(result, Err(WriteError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempt_times_out_and_is_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let started = Instant::now();
        let result = RetryExecutor::default()
            .execute(|| {
                let c = Arc::clone(&c);
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) == 0 {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                    Ok::<_, WriteError>("doc-1")
                }
            })
            .await;
        assert_eq!(result.unwrap(), "doc-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // 15 s timeout plus the first 1 s back-off.
        assert_eq!(started.elapsed(), Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_error_reports_deadline() {
        let executor = RetryExecutor::new(RetryPolicy {
            timeout: Duration::from_millis(250),
            max_retries: 0,
            ..RetryPolicy::default()
        });
        let result = executor
            .execute(|| async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, WriteError>(())
            })
            .await;
        assert!(matches!(result, Err(WriteError::Timeout { after_ms: 250 })));
    }
}
