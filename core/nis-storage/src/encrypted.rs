//! Encrypted JSON-file store for credentials.

use crate::error::{StorageError, StorageResult};
use crate::file::{check_namespace, JsonFile};
use crate::store::KeyValueStore;
use nis_crypto::{decrypt_string, derive_key, encrypt_string, DerivedKey, KdfParams, Salt};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Store in `{dir}/{namespace}.secure.json` whose values are encrypted with
/// ChaCha20-Poly1305.
///
/// Each value is bound to the key it is stored under, so swapping values
/// between keys in the file is detected on read. Keys are not encrypted.
pub struct EncryptedFileStore {
    file: JsonFile,
    key: DerivedKey,
}

impl EncryptedFileStore {
    /// Opens the store with a caller-held 256-bit key.
    pub fn open(dir: impl AsRef<Path>, namespace: &str, key: DerivedKey) -> StorageResult<Self> {
        check_namespace(namespace)?;
        let path = dir.as_ref().join(format!("{namespace}.secure.json"));
        Ok(Self {
            file: JsonFile::open(path)?,
            key,
        })
    }

    /// Opens the store with a base64-encoded key, as produced by
    /// [`DerivedKey::to_base64`] and kept in a credential store or
    /// environment variable.
    pub fn open_with_encoded_key(
        dir: impl AsRef<Path>,
        namespace: &str,
        encoded: &str,
    ) -> StorageResult<Self> {
        let key = DerivedKey::from_base64(encoded)?;
        Self::open(dir, namespace, key)
    }

    /// Opens the store with a key derived from `passphrase`.
    ///
    /// The Argon2id salt lives in `{dir}/{namespace}.salt` and is created on
    /// first use.
    pub fn open_with_passphrase(
        dir: impl AsRef<Path>,
        namespace: &str,
        passphrase: &str,
    ) -> StorageResult<Self> {
        Self::open_with_passphrase_and_params(dir, namespace, passphrase, &KdfParams::default())
    }

    /// Like [`open_with_passphrase`](Self::open_with_passphrase) with explicit
    /// KDF parameters.
    pub fn open_with_passphrase_and_params(
        dir: impl AsRef<Path>,
        namespace: &str,
        passphrase: &str,
        params: &KdfParams,
    ) -> StorageResult<Self> {
        if passphrase.is_empty() {
            return Err(StorageError::InvalidData("empty passphrase".to_string()));
        }
        check_namespace(namespace)?;
        let dir = dir.as_ref();
        let salt = load_or_create_salt(&dir.join(format!("{namespace}.salt")))?;
        let key = derive_key(passphrase, &salt, params)?;
        Self::open(dir, namespace, key)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl KeyValueStore for EncryptedFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match self.file.get(key)? {
            Some(sealed) => Ok(Some(decrypt_string(&self.key, &sealed, key)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let sealed = encrypt_string(&self.key, value, key)?;
        self.file.update(|entries| {
            entries.insert(key.to_string(), sealed);
        })
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.file.update(|entries| {
            entries.remove(key);
        })
    }
}

impl std::fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("path", &self.file.path())
            .finish_non_exhaustive()
    }
}

fn load_or_create_salt(path: &Path) -> StorageResult<Salt> {
    match fs::read_to_string(path) {
        Ok(encoded) => {
            debug!(path = %path.display(), "loaded store salt");
            Ok(Salt::from_base64(&encoded)?)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let salt = Salt::random();
            fs::write(path, salt.to_base64())?;
            info!(path = %path.display(), "created store salt");
            Ok(salt)
        }
        Err(e) => Err(e.into()),
    }
}
