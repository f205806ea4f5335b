//! Records produced by the notification backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-side status of a registered device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Active,
    Inactive,
    Blocked,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Active => write!(f, "active"),
            DeviceStatus::Inactive => write!(f, "inactive"),
            DeviceStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// A device registration as returned by `POST /devices`.
///
/// The registration endpoint only guarantees `device_id`, `device_token`,
/// `default_topics` and `created_at`; the remaining fields fall back to
/// their defaults when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    /// Identifier assigned by the backend.
    pub device_id: String,
    /// Token the backend registered.
    #[serde(rename = "device_token")]
    pub token: String,
    /// Topics the backend wants this device subscribed to, in order.
    #[serde(default)]
    pub default_topics: Vec<String>,
    /// When the registration was created.
    pub created_at: DateTime<Utc>,
    /// When the registration was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Backend-side device status.
    #[serde(default)]
    pub status: DeviceStatus,
}

impl DeviceRegistration {
    /// Whether the backend supplied topics to seed the subscription set.
    #[must_use]
    pub fn has_default_topics(&self) -> bool {
        !self.default_topics.is_empty()
    }
}

/// Acknowledgement of a topic subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSubscription {
    pub topic: String,
    pub status: String,
    pub subscribed_at: DateTime<Utc>,
}
