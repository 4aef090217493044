//! The single entry point for every mutating call.
//!
//! Pipeline: validate → rate limit → circuit breaker → retry → persist.
//! Validation and rate-limit rejections happen before the backend is touched
//! and never count toward the breaker. The cooldown starts only after the
//! backend has accepted the write.

use std::future::Future;
use std::sync::Arc;

use loofind_core::AppConfig;

use crate::circuit_breaker::{BreakerConfig, CircuitBreaker, CircuitState, OperationKind};
use crate::clock::Clock;
use crate::device::DeviceIdentity;
use crate::error::{FieldError, WriteError};
use crate::persistence::{Persistence, PendingEntryDocument, ReportDocument, ReviewDocument};
use crate::rate_limit::RateLimiter;
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::store::KeyValueStore;
use crate::validation::{
    validate_report, validate_review, validate_submission, NewEntry, NewReport, NewReview,
};

pub struct WriteGateway<P> {
    persistence: P,
    clock: Arc<dyn Clock>,
    device: DeviceIdentity,
    rate_limiter: RateLimiter,
    create_entry_breaker: CircuitBreaker,
    add_review_breaker: CircuitBreaker,
    add_report_breaker: CircuitBreaker,
    retry: RetryExecutor,
}

impl<P: Persistence> WriteGateway<P> {
    /// Builds a gateway using breaker and retry settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Store`] if the device identity cannot be loaded
    /// or created.
    pub async fn new(
        persistence: P,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &AppConfig,
    ) -> Result<Self, WriteError> {
        Self::with_policies(
            persistence,
            store,
            clock,
            BreakerConfig::from_app_config(config),
            RetryPolicy::from_app_config(config),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns [`WriteError::Store`] if the device identity cannot be loaded
    /// or created.
    pub async fn with_policies(
        persistence: P,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        breaker: BreakerConfig,
        retry: RetryPolicy,
    ) -> Result<Self, WriteError> {
        let device = DeviceIdentity::load_or_create(store.as_ref()).await?;
        let new_breaker = |operation| {
            CircuitBreaker::new(operation, breaker, Arc::clone(&store), Arc::clone(&clock))
        };
        Ok(Self {
            create_entry_breaker: new_breaker(OperationKind::CreateEntry),
            add_review_breaker: new_breaker(OperationKind::AddReview),
            add_report_breaker: new_breaker(OperationKind::AddReport),
            rate_limiter: RateLimiter::new(device.clone(), Arc::clone(&store), Arc::clone(&clock)),
            retry: RetryExecutor::new(retry),
            persistence,
            clock,
            device,
        })
    }

    #[must_use]
    pub fn device_id(&self) -> &DeviceIdentity {
        &self.device
    }

    /// Seconds until this device may submit again.
    pub async fn remaining_cooldown(&self) -> u64 {
        self.rate_limiter.remaining_cooldown().await
    }

    pub async fn circuit_state(&self, operation: OperationKind) -> CircuitState {
        self.breaker(operation).state().await
    }

    /// Submits a new directory entry for moderation and returns its id.
    ///
    /// # Errors
    ///
    /// See [`WriteError`]; validation and rate-limit errors are raised before
    /// any backend call.
    pub async fn create_entry(&self, entry: &NewEntry) -> Result<String, WriteError> {
        let operation = OperationKind::CreateEntry;
        let sanitized = Self::validated(operation, validate_submission(entry).into_result())?;
        self.rate_limiter.ensure_can_submit().await?;

        let doc = &PendingEntryDocument::new(sanitized, &self.device, self.clock.now());
        let persistence = &self.persistence;
        let id = self
            .guarded(operation, move || async move {
                persistence.create_pending_entry(doc).await.map_err(WriteError::from)
            })
            .await?;
        self.finish(operation, &id).await;
        Ok(id)
    }

    /// Adds a review to an existing entry and returns the review id.
    ///
    /// # Errors
    ///
    /// See [`WriteError`]; a missing entry surfaces as [`WriteError::NotFound`].
    pub async fn add_review(&self, review: &NewReview) -> Result<String, WriteError> {
        let operation = OperationKind::AddReview;
        let sanitized = Self::validated(operation, validate_review(review).into_result())?;
        let rating = sanitized.rating.ok_or_else(|| {
            WriteError::Validation(vec![FieldError::new(
                "rating",
                "Rating must be a whole number between 1 and 5",
            )])
        })?;
        self.rate_limiter.ensure_can_submit().await?;

        let doc = &ReviewDocument {
            entry_id: sanitized.entry_id,
            rating,
            comment: sanitized.comment,
            tags: sanitized.tags,
            device_id: self.device.to_string(),
            created_at: self.clock.now(),
        };
        let persistence = &self.persistence;
        let id = self
            .guarded(operation, move || async move {
                persistence.add_review(doc).await.map_err(WriteError::from)
            })
            .await?;
        self.finish(operation, &id).await;
        Ok(id)
    }

    /// Files a report against an existing entry and returns the report id.
    ///
    /// # Errors
    ///
    /// See [`WriteError`].
    pub async fn file_report(&self, report: &NewReport) -> Result<String, WriteError> {
        let operation = OperationKind::AddReport;
        let sanitized = Self::validated(operation, validate_report(report).into_result())?;
        self.rate_limiter.ensure_can_submit().await?;

        let doc = &ReportDocument::new(sanitized, &self.device, self.clock.now());
        let persistence = &self.persistence;
        let id = self
            .guarded(operation, move || async move {
                persistence.add_report(doc).await.map_err(WriteError::from)
            })
            .await?;
        self.finish(operation, &id).await;
        Ok(id)
    }

    fn breaker(&self, operation: OperationKind) -> &CircuitBreaker {
        match operation {
            OperationKind::CreateEntry => &self.create_entry_breaker,
            OperationKind::AddReview => &self.add_review_breaker,
            OperationKind::AddReport => &self.add_report_breaker,
        }
    }

    fn validated<T>(
        operation: OperationKind,
        result: Result<T, Vec<FieldError>>,
    ) -> Result<T, WriteError> {
        result.map_err(|errors| {
            tracing::debug!(%operation, problems = errors.len(), "submission failed validation");
            WriteError::Validation(errors)
        })
    }

    /// Breaker around retry around the backend call; nothing else is wrapped.
    async fn guarded<F, Fut>(&self, operation: OperationKind, persist: F) -> Result<String, WriteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, WriteError>>,
    {
        self.breaker(operation)
            .execute(|| self.retry.execute(persist))
            .await
            .inspect_err(|err| {
                tracing::warn!(%operation, error = %err, "write failed");
            })
    }

    async fn finish(&self, operation: OperationKind, id: &str) {
        self.rate_limiter.record_submission().await;
        tracing::info!(%operation, id, device_id = %self.device, "write persisted");
    }
}
