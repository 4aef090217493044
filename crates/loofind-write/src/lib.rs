//! Resilient write path: validation, per-device cooldown, circuit breaker and
//! retry around an opaque persistence backend.

pub mod circuit_breaker;
pub mod clock;
pub mod device;
pub mod error;
pub mod gateway;
pub mod persistence;
pub mod rate_limit;
pub mod retry;
pub mod sanitize;
pub mod store;
pub mod validation;

pub use circuit_breaker::{BreakerConfig, CircuitBreaker, CircuitState, OperationKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use device::{DeviceIdentity, DEVICE_ID_KEY};
pub use error::{FieldError, PersistError, StoreError, WriteError};
pub use gateway::WriteGateway;
pub use persistence::{PendingEntryDocument, Persistence, ReportDocument, ReviewDocument};
pub use rate_limit::{RateLimiter, SUBMISSION_COOLDOWN_SECS};
pub use retry::{RetryExecutor, RetryPolicy};
pub use sanitize::sanitize_text;
pub use store::{KeyValueStore, MemoryStore, NamespacedStore};
pub use validation::{
    contains_blocked_term, validate_report, validate_review, validate_submission, NewEntry,
    NewReport, NewReview, SanitizedEntry, SanitizedReport, SanitizedReview, ValidationResult,
    BLOCKED_TERMS,
};
