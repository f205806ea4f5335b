//! Push-notification identity SDK.
//!
//! Keeps a device's push identity (backend-assigned device id plus platform
//! delivery token) and its topic subscriptions in sync with the NIS
//! notification backend.
//!
//! # Architecture
//!
//! - [`NotificationClient`] is the context object the host owns
//! - [`TokenManager`] registers the device or updates its token
//! - [`TopicReconciler`] mirrors acknowledged subscriptions locally
//! - [`EventSender`] feeds platform observations in from host glue
//!
//! Network calls go through [`nis_api::ApiClient`]; state is persisted with
//! [`nis_storage::DeviceStorage`].

mod client;
mod config;
mod error;
mod events;
pub mod logging;
mod token;
mod topics;

pub use client::NotificationClient;
pub use config::{CacheConfig, Configuration, LogLevel};
pub use error::{NotificationError, NotificationResult};
pub use events::{EventSender, HostEvent};
pub use token::{TokenManager, TokenState, TokenTransition};
pub use topics::TopicReconciler;

pub use nis_api::{ApiError, CustomEnvironment, Environment};
pub use nis_storage::DeviceStorage;
pub use nis_types::{BundleInfo, DeviceIdentity, DeviceInfo, Topic, TopicSet};
