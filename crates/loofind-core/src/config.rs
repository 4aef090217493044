use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let env = parse_environment(&or_default("LOOFIND_ENV", "development"))?;
    let log_level = or_default("LOOFIND_LOG_LEVEL", &defaults.log_level);
    let storage_namespace = or_default("LOOFIND_STORAGE_NAMESPACE", &defaults.storage_namespace);
    if storage_namespace.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOOFIND_STORAGE_NAMESPACE".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let breaker_max_failures =
        parse_u32("LOOFIND_BREAKER_MAX_FAILURES", defaults.breaker_max_failures)?;
    if breaker_max_failures == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOOFIND_BREAKER_MAX_FAILURES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let breaker_reset_timeout_secs = parse_u64(
        "LOOFIND_BREAKER_RESET_TIMEOUT_SECS",
        defaults.breaker_reset_timeout_secs,
    )?;

    let write_timeout_ms = parse_u64("LOOFIND_WRITE_TIMEOUT_MS", defaults.write_timeout_ms)?;
    if write_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOOFIND_WRITE_TIMEOUT_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let write_max_retries = parse_u32("LOOFIND_WRITE_MAX_RETRIES", defaults.write_max_retries)?;
    let write_backoff_base_ms =
        parse_u64("LOOFIND_WRITE_BACKOFF_BASE_MS", defaults.write_backoff_base_ms)?;
    let write_backoff_cap_ms =
        parse_u64("LOOFIND_WRITE_BACKOFF_CAP_MS", defaults.write_backoff_cap_ms)?;
    if write_backoff_cap_ms < write_backoff_base_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOOFIND_WRITE_BACKOFF_CAP_MS".to_string(),
            reason: format!(
                "cap ({write_backoff_cap_ms} ms) is below the backoff base ({write_backoff_base_ms} ms)"
            ),
        });
    }

    let entries_cache_ttl_secs = parse_u64(
        "LOOFIND_ENTRIES_CACHE_TTL_SECS",
        defaults.entries_cache_ttl_secs,
    )?;

    Ok(AppConfig {
        env,
        log_level,
        storage_namespace,
        breaker_max_failures,
        breaker_reset_timeout_secs,
        write_timeout_ms,
        write_max_retries,
        write_backoff_base_ms,
        write_backoff_cap_ms,
        entries_cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOOFIND_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
