//! Backend environments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// API version used by the hosted environments.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Which backend the SDK talks to.
///
/// Serializes as `"development"`, `"staging"`, `"production"` or, for a
/// self-hosted backend, `{ custom = { base_url = "...", ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
    Custom(CustomEnvironment),
}

/// A self-hosted or test backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEnvironment {
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub additional_headers: BTreeMap<String, String>,
    /// Refuse plain-HTTP connections.
    #[serde(default = "default_ssl_pinning")]
    pub use_ssl_pinning: bool,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_ssl_pinning() -> bool {
    true
}

impl CustomEnvironment {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: default_api_version(),
            additional_headers: BTreeMap::new(),
            use_ssl_pinning: default_ssl_pinning(),
        }
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Allows plain-HTTP backends (local development, test servers).
    #[must_use]
    pub fn without_ssl_pinning(mut self) -> Self {
        self.use_ssl_pinning = false;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_headers.insert(name.into(), value.into());
        self
    }
}

impl Environment {
    /// Shorthand for a custom environment with default settings.
    pub fn custom(base_url: impl Into<String>) -> Self {
        Environment::Custom(CustomEnvironment::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        match self {
            Environment::Development => "https://dev-api.notification.dev",
            Environment::Staging => "https://staging-api.notification.dev",
            Environment::Production => "https://api.notification.com",
            Environment::Custom(custom) => &custom.base_url,
        }
    }

    pub fn api_version(&self) -> &str {
        match self {
            Environment::Custom(custom) => &custom.api_version,
            _ => DEFAULT_API_VERSION,
        }
    }

    /// Extra headers to send; empty for hosted environments.
    pub fn additional_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        let headers = match self {
            Environment::Custom(custom) => Some(&custom.additional_headers),
            _ => None,
        };
        headers
            .into_iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn uses_ssl_pinning(&self) -> bool {
        match self {
            Environment::Development => false,
            Environment::Staging | Environment::Production => true,
            Environment::Custom(custom) => custom.use_ssl_pinning,
        }
    }

    /// Development and staging backends.
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development | Environment::Staging)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Custom(custom) => write!(f, "custom ({})", custom.base_url),
            other => f.write_str(other.name()),
        }
    }
}
