//! OS credential store backend.

use crate::error::{StorageError, StorageResult};
use crate::store::KeyValueStore;
use keyring::Entry;
use tracing::debug;

/// One OS credential-store entry per key, under service `nis.{namespace}`.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(namespace: &str) -> Self {
        Self {
            service: format!("nis.{namespace}"),
        }
    }

    /// The credential-store service name.
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> StorageResult<Entry> {
        Entry::new(&self.service, key).map_err(keyring_error)
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(keyring_error(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entry(key)?.set_password(value).map_err(keyring_error)?;
        debug!(service = %self.service, key, "stored credential");
        Ok(())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keyring_error(e)),
        }
    }
}

fn keyring_error(err: keyring::Error) -> StorageError {
    StorageError::Keyring(format!("{err:?}"))
}
