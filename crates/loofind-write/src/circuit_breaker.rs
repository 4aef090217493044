//! Consecutive-failure circuit breaker, one per write operation.
//!
//! The breaker is `Closed` or `Open`. Once `reset_timeout` has passed since
//! the last failure, an open breaker admits a single live trial: success
//! closes it, failure re-opens it with a fresh failure timestamp. Every other
//! call made while open fails fast without running the operation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use loofind_core::AppConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::error::WriteError;
use crate::store::KeyValueStore;

/// The protected write operations; each has its own breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    CreateEntry,
    AddReview,
    AddReport,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::CreateEntry,
        OperationKind::AddReview,
        OperationKind::AddReport,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::CreateEntry => "create-entry",
            OperationKind::AddReview => "add-review",
            OperationKind::AddReport => "add-report",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerConfig {
    pub max_failures: u32,
    pub reset_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: 5,
            reset_timeout: Duration::from_secs(60),
        }
    }
}

impl BreakerConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_failures: config.breaker_max_failures,
            reset_timeout: Duration::from_secs(config.breaker_reset_timeout_secs),
        }
    }
}

/// Persisted breaker state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitState {
    pub consecutive_failures: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub open: bool,
}

#[derive(Debug, Default)]
struct BreakerInner {
    hydrated: bool,
    state: CircuitState,
    /// When the current live trial was admitted. In memory only.
    trial_started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Normal,
    Trial,
}

pub struct CircuitBreaker {
    operation: OperationKind,
    config: BreakerConfig,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(
        operation: OperationKind,
        config: BreakerConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            operation,
            config,
            store,
            clock,
            inner: Mutex::new(BreakerInner::default()),
        }
    }

    #[must_use]
    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Current state, hydrated from the store on first use.
    pub async fn state(&self) -> CircuitState {
        let mut inner = self.inner.lock().await;
        self.hydrate(&mut inner).await;
        inner.state
    }

    /// Runs `op` unless the breaker is open.
    ///
    /// The lock is not held while `op` runs.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::CircuitOpen`] without calling `op` while the
    /// breaker is open, otherwise whatever error `op` returned.
    pub async fn execute<T, F, Fut>(&self, op: F) -> Result<T, WriteError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, WriteError>>,
    {
        let admission = self.admit().await?;
        let outcome = op().await;
        match &outcome {
            Ok(_) => self.on_success(admission).await,
            Err(err) => self.on_failure(admission, err).await,
        }
        outcome
    }

    fn storage_key(&self) -> String {
        format!("circuit:{}", self.operation)
    }

    fn reset_elapsed(&self, since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(since) = since else {
            return true;
        };
        (now - since)
            .to_std()
            .is_ok_and(|elapsed| elapsed > self.config.reset_timeout)
    }

    async fn admit(&self) -> Result<Admission, WriteError> {
        let mut inner = self.inner.lock().await;
        self.hydrate(&mut inner).await;
        if !inner.state.open {
            return Ok(Admission::Normal);
        }

        let now = self.clock.now();
        // An abandoned trial frees the slot after another reset period.
        let slot_free = self.reset_elapsed(inner.trial_started_at, now);
        if slot_free && self.reset_elapsed(inner.state.last_failure_at, now) {
            inner.trial_started_at = Some(now);
            tracing::info!(operation = %self.operation, "circuit admitting trial call");
            return Ok(Admission::Trial);
        }

        tracing::debug!(operation = %self.operation, "circuit open; failing fast");
        Err(WriteError::CircuitOpen {
            operation: self.operation,
        })
    }

    async fn on_success(&self, admission: Admission) {
        let mut inner = self.inner.lock().await;
        // A call admitted before the breaker opened does not own the trial slot.
        if admission == Admission::Trial {
            inner.trial_started_at = None;
        }
        if inner.state == CircuitState::default() {
            return;
        }
        if inner.state.open {
            tracing::info!(operation = %self.operation, "circuit closed");
        }
        inner.state = CircuitState::default();
        self.persist(&inner.state).await;
    }

    async fn on_failure(&self, admission: Admission, err: &WriteError) {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let state = &mut inner.state;
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        state.last_failure_at = Some(now);

        if admission == Admission::Trial {
            state.open = true;
            tracing::warn!(operation = %self.operation, error = %err, "circuit trial failed; re-opened");
        } else if !state.open && state.consecutive_failures >= self.config.max_failures {
            state.open = true;
            tracing::warn!(
                operation = %self.operation,
                failures = state.consecutive_failures,
                error = %err,
                "circuit opened"
            );
        }
        let snapshot = *state;
        if admission == Admission::Trial {
            inner.trial_started_at = None;
        }
        self.persist(&snapshot).await;
    }

    async fn hydrate(&self, inner: &mut BreakerInner) {
        if inner.hydrated {
            return;
        }
        inner.hydrated = true;
        let key = self.storage_key();
        match self.store.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<CircuitState>(&raw) {
                Ok(state) => inner.state = state,
                Err(err) => {
                    tracing::warn!(operation = %self.operation, error = %err, "ignoring corrupt circuit state");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(operation = %self.operation, error = %err, "circuit state lookup failed; starting closed");
            }
        }
    }

    async fn persist(&self, state: &CircuitState) {
        let raw = match serde_json::to_string(state) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(operation = %self.operation, error = %err, "failed to encode circuit state");
                return;
            }
        };
        if let Err(err) = self.store.set(&self.storage_key(), &raw).await {
            tracing::warn!(operation = %self.operation, error = %err, "failed to persist circuit state");
        }
    }
}

#[cfg(test)]
#[path = "circuit_breaker_test.rs"]
mod tests;
