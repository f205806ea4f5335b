//! Inbound events from host glue.
//!
//! Platform integrations (a push delegate, a permission callback) turn what
//! they observe into [`HostEvent`]s and push them through an
//! [`EventSender`]. A single listener task applies them to the client in
//! the order they were sent.

use crate::client::NotificationClient;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The platform handed out a (possibly new) push token.
    TokenObserved(String),
    /// The user granted or revoked notification permission.
    PermissionChanged(bool),
}

/// Cheap, cloneable handle for delivering host events.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl EventSender {
    /// Queues an event. Returns false if the listener has stopped.
    pub fn send(&self, event: HostEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn token_observed(&self, token: impl Into<String>) -> bool {
        self.send(HostEvent::TokenObserved(token.into()))
    }

    pub fn permission_changed(&self, granted: bool) -> bool {
        self.send(HostEvent::PermissionChanged(granted))
    }
}

pub(crate) fn spawn_listener(client: Arc<NotificationClient>) -> (EventSender, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        debug!("host event listener started");
        while let Some(event) = rx.recv().await {
            apply(&client, event).await;
        }
        debug!("host event listener stopped");
    });
    (EventSender { tx }, handle)
}

async fn apply(client: &NotificationClient, event: HostEvent) {
    match event {
        HostEvent::TokenObserved(token) => {
            if !client.configuration().automatic_token_refresh {
                info!("automatic token refresh disabled; ignoring observed token");
                return;
            }
            if let Err(e) = client.handle_new_token(&token).await {
                warn!(error = %e, "failed to apply observed token");
            }
        }
        HostEvent::PermissionChanged(granted) => client.handle_permission_change(granted),
    }
}
