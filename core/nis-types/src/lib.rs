//! Core type definitions for the NIS push-identity SDK.
//!
//! This crate defines the data model shared by storage, the API client and
//! the SDK managers:
//! - Device identity (backend-assigned device id + delivery token)
//! - Validated topic names and the persisted topic set
//! - Backend registration and subscription records
//! - Host application and device descriptors sent on registration
//!
//! Nothing here performs I/O beyond reading host descriptors.

mod device;
mod identity;
mod registration;
mod topic;

pub use device::{BundleInfo, DeviceInfo};
pub use identity::DeviceIdentity;
pub use registration::{DeviceRegistration, DeviceStatus, TopicSubscription};
pub use topic::{Topic, TopicSet};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid topic name: {0:?}")]
    InvalidTopic(String),
}
