//! Token lifecycle manager.
//!
//! ```text
//! NoDevice ──register──▶ Registering ──ok──▶ Registered(id, token)
//!                             └──err──▶ NoDevice
//! Registered ──new token──▶ Updating ──ok──▶ Registered(id, new token)
//!                               └──err──▶ Registered(id, old token)
//! ```
//!
//! Observed tokens are handled one at a time in arrival order (the lock is a
//! FIFO async mutex), so a burst of token refreshes can never interleave
//! their backend calls or persist out of order.

use crate::error::{NotificationError, NotificationResult};
use crate::topics::TopicReconciler;
use nis_api::{ApiClient, ApiError};
use nis_storage::DeviceStorage;
use nis_types::DeviceIdentity;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

/// Where the device stands with the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Nothing registered yet.
    NoDevice,
    /// A registration call is in flight.
    Registering,
    /// The backend knows this device under `device_id` with `token`.
    Registered { device_id: String, token: String },
    /// A token update for `device_id` is in flight.
    Updating { device_id: String },
}

impl TokenState {
    fn from_identity(identity: Option<DeviceIdentity>) -> Self {
        match identity {
            Some(DeviceIdentity { device_id, token }) => TokenState::Registered { device_id, token },
            None => TokenState::NoDevice,
        }
    }

    pub fn device_id(&self) -> Option<&str> {
        match self {
            TokenState::Registered { device_id, .. } | TokenState::Updating { device_id } => {
                Some(device_id.as_str())
            }
            _ => None,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, TokenState::Registered { .. })
    }
}

/// What handling a token did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTransition {
    /// The token was already on record; nothing was sent.
    Unchanged,
    /// The device was registered for the first time.
    Registered {
        device_id: String,
        default_topics: Vec<String>,
    },
    /// The backend accepted a replacement token.
    Updated { device_id: String },
}

pub struct TokenManager {
    api: Arc<ApiClient>,
    storage: DeviceStorage,
    topics: Arc<TopicReconciler>,
    auto_register_default_topics: bool,
    lock: Mutex<()>,
    state: watch::Sender<TokenState>,
}

impl TokenManager {
    pub fn new(
        api: Arc<ApiClient>,
        storage: DeviceStorage,
        topics: Arc<TopicReconciler>,
        auto_register_default_topics: bool,
    ) -> Self {
        let (state, _) = watch::channel(TokenState::from_identity(storage.load_identity()));
        Self {
            api,
            storage,
            topics,
            auto_register_default_topics,
            lock: Mutex::new(()),
            state,
        }
    }

    pub fn state(&self) -> TokenState {
        self.state.borrow().clone()
    }

    /// A receiver that sees every state change.
    pub fn watch(&self) -> watch::Receiver<TokenState> {
        self.state.subscribe()
    }

    /// Brings the backend in line with an observed platform token.
    ///
    /// Failures are logged and returned; the persisted identity is left as
    /// it was.
    pub async fn handle_new_token(&self, token: &str) -> NotificationResult<TokenTransition> {
        if token.trim().is_empty() {
            return Err(NotificationError::InvalidToken);
        }

        let _guard = self.lock.lock().await;
        match self.storage.load_identity() {
            Some(identity) if identity.has_token(token) => {
                debug!(device_id = %identity.device_id, "token unchanged");
                Ok(TokenTransition::Unchanged)
            }
            Some(identity) => self.update(identity, token).await,
            None => self.register(token).await,
        }
    }

    /// Forgets the persisted identity and the topic set.
    ///
    /// Both are cleared under the topic writer lock, so a subscription still
    /// in flight cannot record a topic into the reset installation.
    pub async fn reset(&self) -> NotificationResult<()> {
        let _guard = self.lock.lock().await;
        self.topics
            .clear_with(|| self.storage.clear_identity().map_err(Into::into))
            .await?;
        self.state.send_replace(TokenState::NoDevice);
        info!("device identity cleared");
        Ok(())
    }

    async fn register(&self, token: &str) -> NotificationResult<TokenTransition> {
        self.state.send_replace(TokenState::Registering);
        info!("registering device");

        let registration = match self.api.register_device(token).await {
            Ok(registration) => registration,
            Err(e) => {
                error!(error = %e, "device registration failed");
                self.state.send_replace(TokenState::NoDevice);
                return Err(e.into());
            }
        };

        let identity = DeviceIdentity::new(&registration.device_id, token);
        if let Err(e) = self.storage.save_identity(&identity) {
            self.state.send_replace(TokenState::NoDevice);
            return Err(e.into());
        }
        info!(device_id = %identity.device_id, "device registered");
        self.state
            .send_replace(TokenState::from_identity(Some(identity)));

        if self.auto_register_default_topics && registration.has_default_topics() {
            self.seed_default_topics(&registration.default_topics).await;
        }

        Ok(TokenTransition::Registered {
            device_id: registration.device_id,
            default_topics: registration.default_topics,
        })
    }

    /// Subscribes to the backend's default topics one at a time.
    ///
    /// Registration has already succeeded, so nothing here is returned to the
    /// caller. Malformed names are skipped; a backend failure stops the loop
    /// and leaves the remaining topics to the host.
    async fn seed_default_topics(&self, topics: &[String]) {
        for topic in topics {
            match self.topics.subscribe(topic).await {
                Ok(()) => {}
                Err(NotificationError::InvalidTopic(_))
                | Err(NotificationError::Api(ApiError::InvalidUrl(_))) => {
                    warn!(topic = %topic, "skipping malformed default topic");
                }
                Err(e) => {
                    warn!(topic = %topic, error = %e, "default topic subscription incomplete");
                    return;
                }
            }
        }
    }

    async fn update(
        &self,
        current: DeviceIdentity,
        token: &str,
    ) -> NotificationResult<TokenTransition> {
        self.state.send_replace(TokenState::Updating {
            device_id: current.device_id.clone(),
        });
        info!(device_id = %current.device_id, "updating push token");

        let updated = current.with_token(token);
        let result = match self.api.update_token(&current.device_id, token).await {
            Ok(_) => self.storage.save_identity(&updated).map_err(Into::into),
            Err(e) => Err(NotificationError::from(e)),
        };

        match result {
            Ok(()) => {
                info!(device_id = %updated.device_id, "push token updated");
                let device_id = updated.device_id.clone();
                self.state
                    .send_replace(TokenState::from_identity(Some(updated)));
                Ok(TokenTransition::Updated { device_id })
            }
            Err(e) => {
                error!(device_id = %current.device_id, error = %e, "token update failed");
                self.state
                    .send_replace(TokenState::from_identity(Some(current)));
                Err(e)
            }
        }
    }
}
