#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for the directory core.
///
/// Every field has a default; see [`crate::config::load_app_config`] for the
/// environment variables that override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Prefix mixed into every hashed storage key.
    pub storage_namespace: String,
    /// Consecutive failures that open a circuit breaker.
    pub breaker_max_failures: u32,
    pub breaker_reset_timeout_secs: u64,
    /// Hard deadline for a single persistence attempt.
    pub write_timeout_ms: u64,
    pub write_max_retries: u32,
    pub write_backoff_base_ms: u64,
    pub write_backoff_cap_ms: u64,
    pub entries_cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            log_level: "info".to_string(),
            storage_namespace: "loofind".to_string(),
            breaker_max_failures: 5,
            breaker_reset_timeout_secs: 60,
            write_timeout_ms: 15_000,
            write_max_retries: 3,
            write_backoff_base_ms: 1_000,
            write_backoff_cap_ms: 10_000,
            entries_cache_ttl_secs: 900,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.env == Environment::Development
    }
}
