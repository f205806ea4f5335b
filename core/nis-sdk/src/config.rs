//! SDK configuration.
//!
//! ```toml
//! environment = "staging"
//! log_level = "debug"
//! max_retry_attempts = 5
//!
//! [cache]
//! max_age_secs = 600
//! ```
//!
//! Every field is optional; missing fields take the production defaults.
//! A self-hosted backend is configured as a table:
//!
//! ```toml
//! [environment.custom]
//! base_url = "https://push.example.com"
//! additional_headers = { "X-Tenant" = "acme" }
//! ```

use crate::error::{NotificationError, NotificationResult};
use nis_api::{ApiClientConfig, Environment, RetryPolicy};
use nis_types::{BundleInfo, DeviceInfo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Verbosity of SDK logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        })
    }
}

impl FromStr for LogLevel {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(NotificationError::Config(format!("unknown log level: {other}"))),
        }
    }
}

/// Limits for locally cached backend data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_age_secs: u64,
    pub persist_between_launches: bool,
    pub max_size_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 3600,
            persist_between_launches: true,
            max_size_bytes: 10 * 1024 * 1024,
        }
    }
}

impl CacheConfig {
    pub fn debug() -> Self {
        Self {
            max_age_secs: 300,
            persist_between_launches: false,
            max_size_bytes: 5 * 1024 * 1024,
        }
    }

    pub fn production() -> Self {
        Self {
            max_age_secs: 3600,
            persist_between_launches: true,
            max_size_bytes: 20 * 1024 * 1024,
        }
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

/// SDK settings, fixed for the lifetime of a
/// [`NotificationClient`](crate::NotificationClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub environment: Environment,
    pub log_level: LogLevel,
    /// Subscribe to the backend's default topics right after registration.
    pub auto_register_default_topics: bool,
    /// Attempts per backend call, including the first.
    pub max_retry_attempts: u32,
    /// Wait before the first retry; doubles for each further retry.
    pub retry_base_delay_ms: u64,
    /// Upper bound on a single retry wait.
    pub retry_max_delay_secs: u64,
    pub request_timeout_secs: u64,
    /// Apply tokens delivered through the host event channel as they arrive.
    pub automatic_token_refresh: bool,
    pub cache: CacheConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::production()
    }
}

impl Configuration {
    /// Development backend, verbose logging, a single attempt per call.
    pub fn debug() -> Self {
        Self {
            environment: Environment::Development,
            log_level: LogLevel::Debug,
            auto_register_default_topics: true,
            max_retry_attempts: 1,
            retry_base_delay_ms: 1000,
            retry_max_delay_secs: 30,
            request_timeout_secs: 60,
            automatic_token_refresh: true,
            cache: CacheConfig::debug(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            log_level: LogLevel::Info,
            auto_register_default_topics: true,
            max_retry_attempts: 3,
            retry_base_delay_ms: 1000,
            retry_max_delay_secs: 30,
            request_timeout_secs: 30,
            automatic_token_refresh: true,
            cache: CacheConfig::production(),
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> NotificationResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| NotificationError::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file.
    pub fn load(path: impl AsRef<Path>) -> NotificationResult<Self> {
        let path = path.as_ref();
        info!(?path, "loading SDK configuration");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            NotificationError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> NotificationResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| NotificationError::Config(format!("cannot serialize configuration: {e}")))
    }

    pub fn validate(&self) -> NotificationResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(NotificationError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.cache.max_size_bytes == 0 {
            return Err(NotificationError::Config(
                "cache.max_size_bytes must be greater than 0".into(),
            ));
        }
        if let Environment::Custom(custom) = &self.environment {
            if custom.base_url.trim().is_empty() {
                return Err(NotificationError::Config(
                    "custom environment needs a base_url".into(),
                ));
            }
        }
        debug!(environment = %self.environment, "configuration validated");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
        .with_max_delay(Duration::from_secs(self.retry_max_delay_secs))
    }

    /// Settings for the underlying [`ApiClient`](nis_api::ApiClient).
    pub fn api_client_config(&self, bundle: BundleInfo, device: DeviceInfo) -> ApiClientConfig {
        ApiClientConfig {
            environment: self.environment.clone(),
            request_timeout: self.request_timeout(),
            retry: self.retry_policy(),
            bundle,
            device,
        }
    }
}
