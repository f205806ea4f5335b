//! The SDK entry point.

use crate::config::Configuration;
use crate::error::{NotificationError, NotificationResult};
use crate::events::{self, EventSender};
use crate::token::{TokenManager, TokenState, TokenTransition};
use crate::topics::TopicReconciler;
use nis_api::ApiClient;
use nis_storage::DeviceStorage;
use nis_types::{BundleInfo, DeviceIdentity, DeviceInfo, TopicSet};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// One SDK instance for one host application.
///
/// Owns the API client, storage, token manager and topic reconciler. Hosts
/// construct it once and share it (typically behind an `Arc`); nothing is
/// global, so tests and multi-tenant hosts can run several side by side.
pub struct NotificationClient {
    config: Configuration,
    bundle: BundleInfo,
    api: Arc<ApiClient>,
    storage: DeviceStorage,
    tokens: TokenManager,
    topics: Arc<TopicReconciler>,
    permission: watch::Sender<Option<bool>>,
}

impl NotificationClient {
    /// Builds a client with device info collected from the running host.
    ///
    /// The client cannot reach the backend until [`configure`](Self::configure)
    /// supplies the API key.
    pub fn new(
        config: Configuration,
        bundle: BundleInfo,
        storage: DeviceStorage,
    ) -> NotificationResult<Self> {
        Self::with_device_info(config, bundle, DeviceInfo::collect(), storage)
    }

    pub fn with_device_info(
        config: Configuration,
        bundle: BundleInfo,
        device: DeviceInfo,
        storage: DeviceStorage,
    ) -> NotificationResult<Self> {
        config.validate()?;
        if !bundle.has_valid_bundle_id() {
            warn!(bundle_id = %bundle.bundle_id, "bundle id is not reverse-DNS");
        }
        if storage.namespace() != bundle.bundle_id {
            warn!(
                namespace = storage.namespace(),
                bundle_id = %bundle.bundle_id,
                "storage namespace differs from bundle id"
            );
        }

        let api = Arc::new(ApiClient::new(
            config.api_client_config(bundle.clone(), device),
        )?);
        let topics = Arc::new(TopicReconciler::new(api.clone(), storage.clone()));
        let tokens = TokenManager::new(
            api.clone(),
            storage.clone(),
            topics.clone(),
            config.auto_register_default_topics,
        );
        let (permission, _) = watch::channel(None);

        info!(
            environment = %config.environment,
            bundle_id = %bundle.bundle_id,
            "notification client created"
        );

        Ok(Self {
            config,
            bundle,
            api,
            storage,
            tokens,
            topics,
            permission,
        })
    }

    /// Builds and configures a client in one step.
    pub async fn initialize(
        config: Configuration,
        bundle: BundleInfo,
        storage: DeviceStorage,
        api_key: impl Into<String>,
    ) -> NotificationResult<Self> {
        let client = Self::new(config, bundle, storage)?;
        client.configure(api_key).await?;
        Ok(client)
    }

    /// Supplies the API key used for every backend call.
    pub async fn configure(&self, api_key: impl Into<String>) -> NotificationResult<()> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NotificationError::Config("API key must not be empty".into()));
        }
        self.api.configure(api_key).await;
        Ok(())
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn bundle(&self) -> &BundleInfo {
        &self.bundle
    }

    // ── Token lifecycle ──────────────────────────────────────────

    /// Applies a token handed out by the platform push service.
    pub async fn handle_new_token(&self, token: &str) -> NotificationResult<TokenTransition> {
        self.tokens.handle_new_token(token).await
    }

    pub fn token_state(&self) -> TokenState {
        self.tokens.state()
    }

    /// Observes token state changes.
    pub fn watch_token_state(&self) -> watch::Receiver<TokenState> {
        self.tokens.watch()
    }

    pub fn device_identity(&self) -> Option<DeviceIdentity> {
        self.storage.load_identity()
    }

    // ── Permission ───────────────────────────────────────────────

    /// Records whether the user granted notification permission.
    pub fn handle_permission_change(&self, granted: bool) {
        let previous = self.permission.send_replace(Some(granted));
        if previous != Some(granted) {
            info!(granted, "notification permission changed");
        }
    }

    /// The last reported permission, if any was reported.
    pub fn permission_granted(&self) -> Option<bool> {
        *self.permission.borrow()
    }

    // ── User association ─────────────────────────────────────────

    pub async fn associate_user(&self, user_id: &str) -> NotificationResult<()> {
        let device_id = self.require_device_id()?;
        self.api.associate_user(&device_id, user_id).await?;
        info!(%device_id, "user associated with device");
        Ok(())
    }

    pub async fn remove_user_association(&self) -> NotificationResult<()> {
        let device_id = self.require_device_id()?;
        self.api.remove_user_association(&device_id).await?;
        info!(%device_id, "user association removed");
        Ok(())
    }

    // ── Topics ───────────────────────────────────────────────────

    pub async fn subscribe(&self, topic: &str) -> NotificationResult<()> {
        self.topics.subscribe(topic).await
    }

    pub async fn unsubscribe(&self, topic: &str) -> NotificationResult<()> {
        self.topics.unsubscribe(topic).await
    }

    pub async fn subscribe_many<S: AsRef<str>>(&self, topics: &[S]) -> NotificationResult<()> {
        self.topics.subscribe_many(topics).await
    }

    pub async fn unsubscribe_many<S: AsRef<str>>(&self, topics: &[S]) -> NotificationResult<()> {
        self.topics.unsubscribe_many(topics).await
    }

    pub fn subscribed_topics(&self) -> TopicSet {
        self.topics.subscribed()
    }

    /// Drops the local topic set without telling the backend.
    pub async fn clear_topics(&self) -> NotificationResult<()> {
        self.topics.clear_all().await
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Forgets the device identity and all topics. The next token is
    /// registered as a new device.
    pub async fn reset(&self) -> NotificationResult<()> {
        self.tokens.reset().await
    }

    /// Starts a task that applies host events in arrival order.
    ///
    /// The task ends once every [`EventSender`] clone has been dropped.
    pub fn start_event_listener(self: &Arc<Self>) -> (EventSender, JoinHandle<()>) {
        events::spawn_listener(self.clone())
    }

    fn require_device_id(&self) -> NotificationResult<String> {
        self.storage
            .device_id()
            .ok_or(NotificationError::NoDeviceIdentity)
    }
}

impl std::fmt::Debug for NotificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationClient")
            .field("environment", &self.config.environment)
            .field("bundle_id", &self.bundle.bundle_id)
            .field("state", &self.tokens.state())
            .finish_non_exhaustive()
    }
}
