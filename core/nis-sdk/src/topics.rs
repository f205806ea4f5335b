//! Topic subscription reconciler.
//!
//! Keeps the persisted topic set in line with what the backend has
//! acknowledged. The set is only changed after a successful call, and every
//! change is a load-modify-save under one writer lock so concurrent calls
//! for different topics never lose each other's updates. A change is dropped
//! if the device it was acknowledged for is no longer the stored identity.

use crate::error::{NotificationError, NotificationResult};
use nis_api::ApiClient;
use nis_storage::DeviceStorage;
use nis_types::{Topic, TopicSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct TopicReconciler {
    api: Arc<ApiClient>,
    storage: DeviceStorage,
    write_lock: Mutex<()>,
}

impl TopicReconciler {
    pub fn new(api: Arc<ApiClient>, storage: DeviceStorage) -> Self {
        Self {
            api,
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Subscribes to `topic` and records it.
    ///
    /// Subscribing to a topic already in the set still calls the backend; the
    /// set never holds duplicates.
    pub async fn subscribe(&self, topic: &str) -> NotificationResult<()> {
        let topic = Topic::parse(topic)?;
        let device_id = self.device_id()?;

        self.api.subscribe_topic(&device_id, topic.as_str()).await?;
        self.update(&device_id, |set| {
            set.insert(topic.as_str());
        })
        .await?;
        info!(topic = %topic, "subscribed to topic");
        Ok(())
    }

    /// Unsubscribes from `topic` and drops it from the set.
    pub async fn unsubscribe(&self, topic: &str) -> NotificationResult<()> {
        let topic = Topic::parse(topic)?;
        let device_id = self.device_id()?;

        self.api.unsubscribe_topic(&device_id, topic.as_str()).await?;
        self.update(&device_id, |set| {
            set.remove(topic.as_str());
        })
        .await?;
        info!(topic = %topic, "unsubscribed from topic");
        Ok(())
    }

    /// Subscribes to each topic in order, stopping at the first failure.
    ///
    /// Every name is validated before the first call. Topics that succeeded
    /// before a failure stay recorded.
    pub async fn subscribe_many<S: AsRef<str>>(&self, topics: &[S]) -> NotificationResult<()> {
        let topics = parse_all(topics)?;
        for topic in &topics {
            if let Err(e) = self.subscribe(topic.as_str()).await {
                warn!(topic = %topic, error = %e, "bulk subscribe stopped");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Unsubscribes from each topic in order, stopping at the first failure.
    pub async fn unsubscribe_many<S: AsRef<str>>(&self, topics: &[S]) -> NotificationResult<()> {
        let topics = parse_all(topics)?;
        for topic in &topics {
            if let Err(e) = self.unsubscribe(topic.as_str()).await {
                warn!(topic = %topic, error = %e, "bulk unsubscribe stopped");
                return Err(e);
            }
        }
        Ok(())
    }

    /// The persisted set. No network call.
    pub fn subscribed(&self) -> TopicSet {
        self.storage.load_topics()
    }

    /// Forgets every topic locally. The backend is not told.
    pub async fn clear_all(&self) -> NotificationResult<()> {
        self.clear_with(|| Ok(())).await
    }

    /// Runs `forget` and then clears the set, both under the writer lock.
    pub(crate) async fn clear_with(
        &self,
        forget: impl FnOnce() -> NotificationResult<()>,
    ) -> NotificationResult<()> {
        let _guard = self.write_lock.lock().await;
        forget()?;
        self.storage.clear_topics()?;
        info!("cleared local topic set");
        Ok(())
    }

    fn device_id(&self) -> NotificationResult<String> {
        self.storage
            .device_id()
            .ok_or(NotificationError::NoDeviceIdentity)
    }

    async fn update(
        &self,
        device_id: &str,
        apply: impl FnOnce(&mut TopicSet),
    ) -> NotificationResult<()> {
        let _guard = self.write_lock.lock().await;
        if self.storage.device_id().as_deref() != Some(device_id) {
            warn!(device_id, "device identity changed during topic call; change dropped");
            return Err(NotificationError::NoDeviceIdentity);
        }
        let mut topics = self.storage.load_topics();
        apply(&mut topics);
        self.storage.save_topics(&topics)?;
        debug!(count = topics.len(), "topic set updated");
        Ok(())
    }
}

fn parse_all<S: AsRef<str>>(topics: &[S]) -> NotificationResult<Vec<Topic>> {
    topics
        .iter()
        .map(|t| Topic::parse(t.as_ref()).map_err(NotificationError::from))
        .collect()
}
