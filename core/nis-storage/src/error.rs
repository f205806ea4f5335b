//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encryption/decryption error.
    #[error("encryption error: {0}")]
    Encryption(#[from] nis_crypto::CryptoError),

    /// OS credential store error.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// Invalid data or arguments.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The store cannot be used (poisoned lock, missing backend).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
