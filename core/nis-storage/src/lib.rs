//! Namespaced secure key-value storage for the NIS SDK.
//!
//! # Backends
//!
//! - [`MemoryStore`]: in-process map
//! - [`FileStore`]: clear-text JSON file, written atomically
//! - [`EncryptedFileStore`]: JSON file with ChaCha20-Poly1305 sealed values
//! - `KeyringStore` (feature `os-keyring`): OS credential store
//!
//! [`DeviceStorage`] sits on top and owns the key layout for the device
//! identity and the subscribed topic set.

mod device;
mod encrypted;
mod error;
mod file;
#[cfg(feature = "os-keyring")]
mod keyring_store;
mod store;

pub use device::DeviceStorage;
pub use encrypted::EncryptedFileStore;
pub use error::{StorageError, StorageResult};
pub use file::FileStore;
#[cfg(feature = "os-keyring")]
pub use keyring_store::KeyringStore;
pub use store::{KeyValueStore, MemoryStore};
