//! Request bodies.

use chrono::{DateTime, Utc};
use nis_types::{BundleInfo, DeviceInfo};
use serde::Serialize;

/// Body of `POST /devices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterDeviceRequest {
    pub device_token: String,
    pub platform: String,
    pub bundle_id: String,
    pub app_name: String,
    pub app_version: String,
    pub device_model: String,
    pub os_version: String,
    pub timestamp: DateTime<Utc>,
}

impl RegisterDeviceRequest {
    pub fn new(token: &str, bundle: &BundleInfo, device: &DeviceInfo) -> Self {
        Self {
            device_token: token.to_string(),
            platform: device.platform.clone(),
            bundle_id: bundle.bundle_id.clone(),
            app_name: bundle.app_name.clone(),
            app_version: bundle.app_version.clone(),
            device_model: device.device_model.clone(),
            os_version: device.os_version.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Body of `PUT /devices/{id}/token`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateTokenRequest {
    pub device_token: String,
    pub timestamp: DateTime<Utc>,
}

impl UpdateTokenRequest {
    pub fn new(token: &str) -> Self {
        Self {
            device_token: token.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Body of `POST /devices/{id}/user`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociateUserRequest {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

impl AssociateUserRequest {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
        }
    }
}
