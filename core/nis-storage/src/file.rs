//! JSON-file backed store.

use crate::error::{StorageError, StorageResult};
use crate::store::{poisoned, KeyValueStore};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// A JSON object on disk mirrored by an in-memory map.
///
/// Mutations are applied to a copy, written to a temp file and renamed into
/// place; the in-memory map only changes once the rename succeeded.
#[derive(Debug)]
pub(crate) struct JsonFile {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFile {
    pub(crate) fn open(path: PathBuf) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened store file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    pub(crate) fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        let mut next = entries.clone();
        apply(&mut next);
        self.write(&next)?;
        *entries = next;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Plain JSON store in `{dir}/{namespace}.json`.
///
/// Values are stored in clear text; use it for data that is not a credential
/// (the subscribed topic set).
#[derive(Debug)]
pub struct FileStore {
    file: JsonFile,
}

impl FileStore {
    /// Opens (or creates) the store for `namespace` inside `dir`.
    pub fn open(dir: impl AsRef<Path>, namespace: &str) -> StorageResult<Self> {
        check_namespace(namespace)?;
        let path = dir.as_ref().join(format!("{namespace}.json"));
        Ok(Self {
            file: JsonFile::open(path)?,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.file.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.file.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.file.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Namespaces end up in file names, so they must not contain path syntax.
pub(crate) fn check_namespace(namespace: &str) -> StorageResult<()> {
    let valid = !namespace.is_empty()
        && namespace != "."
        && namespace != ".."
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidData(format!(
            "invalid store namespace: {namespace:?}"
        )))
    }
}
