pub mod app_config;
pub mod config;
pub mod facility;
pub mod geo;
pub mod repository;
pub mod telemetry;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use facility::{EntrySource, Facility, ReportIssue, VerificationStatus};
pub use geo::{distance_km, find_nearby, DEFAULT_NEARBY_THRESHOLD_KM};
pub use repository::EntryRepository;
pub use telemetry::init_tracing;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
