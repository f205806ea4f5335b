//! Namespaced persistence of the device identity and topic set.

use crate::error::StorageResult;
use crate::store::{KeyValueStore, MemoryStore};
use nis_types::{DeviceIdentity, TopicSet};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Persists the SDK state for one host application.
///
/// The identity goes to the secure store as a single JSON record under
/// `com.nis.{namespace}.identity`; the topic set goes to the preferences
/// store under `com.nis.{namespace}.subscribedTopics`.
///
/// Reads never fail: problems are logged and reported as absent. Writes are
/// logged and returned to the caller.
#[derive(Clone)]
pub struct DeviceStorage {
    namespace: String,
    secure: Arc<dyn KeyValueStore>,
    prefs: Arc<dyn KeyValueStore>,
}

impl DeviceStorage {
    pub fn new(
        namespace: impl Into<String>,
        secure: Arc<dyn KeyValueStore>,
        prefs: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            secure,
            prefs,
        }
    }

    /// Both halves kept in memory.
    pub fn in_memory(namespace: impl Into<String>) -> Self {
        Self::new(
            namespace,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identity_key(&self) -> String {
        format!("com.nis.{}.identity", self.namespace)
    }

    pub fn topics_key(&self) -> String {
        format!("com.nis.{}.subscribedTopics", self.namespace)
    }

    // ── Identity ─────────────────────────────────────────────────

    pub fn load_identity(&self) -> Option<DeviceIdentity> {
        let key = self.identity_key();
        let raw = match self.secure.get(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                error!(key, error = %e, "failed to read device identity");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable device identity");
                None
            }
        }
    }

    pub fn device_id(&self) -> Option<String> {
        self.load_identity().map(|identity| identity.device_id)
    }

    pub fn token(&self) -> Option<String> {
        self.load_identity().map(|identity| identity.token)
    }

    /// Commits device id and token together.
    pub fn save_identity(&self, identity: &DeviceIdentity) -> StorageResult<()> {
        let key = self.identity_key();
        let json = serde_json::to_string(identity)?;
        self.secure.set(&key, &json).inspect_err(|e| {
            error!(key, error = %e, "failed to persist device identity");
        })?;
        debug!(device_id = %identity.device_id, "persisted device identity");
        Ok(())
    }

    pub fn clear_identity(&self) -> StorageResult<()> {
        let key = self.identity_key();
        self.secure.delete(&key).inspect_err(|e| {
            error!(key, error = %e, "failed to clear device identity");
        })
    }

    // ── Topics ───────────────────────────────────────────────────

    pub fn load_topics(&self) -> TopicSet {
        let key = self.topics_key();
        let raw = match self.prefs.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return TopicSet::new(),
            Err(e) => {
                error!(key, error = %e, "failed to read subscribed topics");
                return TopicSet::new();
            }
        };
        TopicSet::from_json(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "discarding unreadable topic set");
            TopicSet::new()
        })
    }

    pub fn save_topics(&self, topics: &TopicSet) -> StorageResult<()> {
        let key = self.topics_key();
        let json = serde_json::to_string(topics)?;
        self.prefs.set(&key, &json).inspect_err(|e| {
            error!(key, error = %e, "failed to persist subscribed topics");
        })?;
        debug!(count = topics.len(), "persisted subscribed topics");
        Ok(())
    }

    pub fn clear_topics(&self) -> StorageResult<()> {
        let key = self.topics_key();
        self.prefs.delete(&key).inspect_err(|e| {
            error!(key, error = %e, "failed to clear subscribed topics");
        })
    }

    /// Removes identity and topics. Both deletes are attempted; the first
    /// error is returned.
    pub fn clear_all(&self) -> StorageResult<()> {
        let identity = self.clear_identity();
        let topics = self.clear_topics();
        identity.and(topics)
    }
}

impl std::fmt::Debug for DeviceStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStorage")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
