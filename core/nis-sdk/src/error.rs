//! SDK error types.

use nis_api::ApiError;
use nis_storage::StorageError;
use thiserror::Error;

/// Result type for SDK operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors surfaced to the host application.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The backend call failed (after retries, where applicable).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation needs a registered device and none is persisted.
    #[error("no device identity; deliver a push token first")]
    NoDeviceIdentity,

    /// The topic name contains characters outside `[a-zA-Z0-9-_.]`.
    #[error("invalid topic name: {0:?}")]
    InvalidTopic(String),

    /// The platform handed out an empty token.
    #[error("invalid push token")]
    InvalidToken,

    /// Persisting state failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<nis_types::Error> for NotificationError {
    fn from(err: nis_types::Error) -> Self {
        match err {
            nis_types::Error::InvalidTopic(name) => NotificationError::InvalidTopic(name),
            nis_types::Error::Serialization(e) => {
                NotificationError::Storage(StorageError::Serialization(e))
            }
        }
    }
}

impl NotificationError {
    /// Returns true if the failure came from the network layer and a later
    /// attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, NotificationError::Api(e) if e.is_retryable())
    }
}
