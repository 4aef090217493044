//! Per-device submission cooldown.
//!
//! This is a client-local throttle: one record per device, hydrated lazily
//! from the key-value store and written back after each submission. Store
//! failures never block a submission; an unreadable record counts as absent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::device::DeviceIdentity;
use crate::error::WriteError;
use crate::store::KeyValueStore;

/// Minimum wait between two submissions from the same device.
pub const SUBMISSION_COOLDOWN_SECS: u64 = 90;

#[allow(clippy::cast_possible_wrap)]
const COOLDOWN_MS: i64 = SUBMISSION_COOLDOWN_SECS as i64 * 1000;

#[derive(Debug, Default)]
struct RateLimitRecord {
    hydrated: bool,
    last_submission_at: Option<DateTime<Utc>>,
}

pub struct RateLimiter {
    device: DeviceIdentity,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    record: Mutex<RateLimitRecord>,
}

impl RateLimiter {
    pub fn new(
        device: DeviceIdentity,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            device,
            store,
            clock,
            record: Mutex::new(RateLimitRecord::default()),
        }
    }

    fn storage_key(&self) -> String {
        format!("rateLimit:{}", self.device)
    }

    /// `true` when no submission is recorded or the cooldown has fully elapsed.
    pub async fn can_submit(&self) -> bool {
        self.remaining_cooldown().await == 0
    }

    /// Whole seconds left before the next submission is allowed, rounded up.
    pub async fn remaining_cooldown(&self) -> u64 {
        let mut record = self.record.lock().await;
        let Some(last) = self.last_submission(&mut record).await else {
            return 0;
        };
        // A clock that moved backwards never extends the wait past one cooldown.
        let elapsed_ms = (self.clock.now() - last).num_milliseconds().max(0);
        let remaining_ms = u64::try_from(COOLDOWN_MS - elapsed_ms).unwrap_or(0);
        remaining_ms.div_ceil(1000)
    }

    /// Rejects with [`WriteError::RateLimited`] while the cooldown is running.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::RateLimited`] carrying the remaining seconds.
    pub async fn ensure_can_submit(&self) -> Result<(), WriteError> {
        let remaining_secs = self.remaining_cooldown().await;
        if remaining_secs == 0 {
            return Ok(());
        }
        tracing::debug!(device_id = %self.device, remaining_secs, "submission rate limited");
        Err(WriteError::RateLimited { remaining_secs })
    }

    /// Starts a new cooldown at the current time.
    ///
    /// The stored timestamp never moves backwards. A failed write-back is
    /// logged; the in-memory record still applies for this process.
    pub async fn record_submission(&self) {
        let mut record = self.record.lock().await;
        let now = self.clock.now();
        let at = match self.last_submission(&mut record).await {
            Some(last) if last > now => last,
            _ => now,
        };
        record.last_submission_at = Some(at);
        record.hydrated = true;

        let value = at.timestamp_millis().to_string();
        if let Err(err) = self.store.set(&self.storage_key(), &value).await {
            tracing::warn!(device_id = %self.device, error = %err, "failed to persist rate-limit record");
        }
    }

    async fn last_submission(&self, record: &mut RateLimitRecord) -> Option<DateTime<Utc>> {
        if !record.hydrated {
            match self.store.get(&self.storage_key()).await {
                Ok(stored) => {
                    record.last_submission_at = stored.as_deref().and_then(|raw| {
                        let parsed = raw
                            .parse::<i64>()
                            .ok()
                            .and_then(DateTime::from_timestamp_millis);
                        if parsed.is_none() {
                            tracing::warn!(device_id = %self.device, raw, "ignoring corrupt rate-limit record");
                        }
                        parsed
                    });
                    record.hydrated = true;
                }
                Err(err) => {
                    tracing::warn!(device_id = %self.device, error = %err, "rate-limit lookup failed; allowing submission");
                }
            }
        }
        record.last_submission_at
    }
}
