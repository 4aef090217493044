use tracing_subscriber::EnvFilter;

use crate::ConfigError;

/// Installs the global `tracing` subscriber for a host application.
///
/// `RUST_LOG` wins when set; otherwise `log_level` (usually
/// [`crate::AppConfig::log_level`]) is used as the filter directive. Library
/// code in this workspace only emits events and never calls this itself.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if `log_level` is not a valid
/// filter directive, or if a global subscriber is already installed.
pub fn init_tracing(log_level: &str) -> Result<(), ConfigError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "LOOFIND_LOG_LEVEL".to_string(),
            reason: e.to_string(),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "LOOFIND_LOG_LEVEL".to_string(),
            reason: e.to_string(),
        })
}
