//! Device identity as acknowledged by the notification backend.

use serde::{Deserialize, Serialize};

/// The pair of backend-assigned device id and current delivery token.
///
/// Persisted as a single record so the two halves are always committed
/// together. `device_id` never changes once assigned; `token` is replaced
/// every time the platform hands out a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Backend-assigned identifier, immutable for the installation.
    pub device_id: String,
    /// Current platform delivery token.
    pub token: String,
}

impl DeviceIdentity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(device_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            token: token.into(),
        }
    }

    /// Returns a copy of this identity carrying a replacement token.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            device_id: self.device_id.clone(),
            token: token.into(),
        }
    }

    /// Whether `token` is the token already on record.
    #[must_use]
    pub fn has_token(&self, token: &str) -> bool {
        self.token == token
    }
}
