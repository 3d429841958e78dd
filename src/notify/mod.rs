//! In-app notifications and the live broadcast channel.
//!
//! [`Notifier`] is an explicitly constructed object injected through
//! [`crate::state::AppState`] — no process-global handle. It persists each
//! notification, then fans it out to every connected websocket client over
//! a `tokio::sync::broadcast` channel. Announcements are broadcast-only;
//! there is no per-topic filtering, all clients receive everything.

use crate::domain::{Notification, NotificationKind, RelatedKind};
use crate::error::ApiResult;
use crate::store::NotificationStore;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;
use uuid::Uuid;

/// Messages pushed over the live channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LiveEvent {
    /// A persisted notification, delivered in real time.
    Notification {
        /// The notification row as stored.
        notification: Notification,
    },
    /// A broadcast announcement relayed to all clients.
    Announcement {
        /// Announcement text.
        message: String,
        /// Milliseconds since epoch.
        at: i64,
    },
}

/// Persists notifications and publishes them to the live channel.
#[derive(Clone)]
pub struct Notifier {
    store: NotificationStore,
    tx: broadcast::Sender<LiveEvent>,
}

impl Notifier {
    /// Buffered events per subscriber before slow clients start losing
    /// messages.
    const CHANNEL_CAPACITY: usize = 256;

    /// Create a notifier over the given store.
    #[must_use]
    pub fn new(store: NotificationStore) -> Self {
        let (tx, _) = broadcast::channel(Self::CHANNEL_CAPACITY);
        Self { store, tx }
    }

    /// Subscribe a websocket connection to the live feed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }

    /// Persist a notification and push it to connected clients.
    ///
    /// A send error only means nobody is connected and is ignored.
    ///
    /// # Errors
    ///
    /// Database failures from the insert.
    pub async fn notify(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        kind: NotificationKind,
        related: Option<(Uuid, RelatedKind)>,
    ) -> ApiResult<Notification> {
        let notification = self
            .store
            .insert(user_id, title, message, kind, related)
            .await?;
        let _ = self.tx.send(LiveEvent::Notification {
            notification: notification.clone(),
        });
        Ok(notification)
    }

    /// Fire-and-forget variant for workflow side effects: runs as a
    /// detached task, logs and drops any failure.
    pub fn notify_in_background(
        &self,
        user_id: Uuid,
        title: String,
        message: String,
        kind: NotificationKind,
        related: Option<(Uuid, RelatedKind)>,
    ) {
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier
                .notify(user_id, &title, &message, kind, related)
                .await
            {
                warn!(user_id = %user_id, error = %err, "notification dispatch failed");
            }
        });
    }

    /// Relay an announcement to every connected client.
    pub fn announce(&self, message: String) {
        let _ = self.tx.send(LiveEvent::Announcement {
            message,
            at: Utc::now().timestamp_millis(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn live_event_serializes_with_type_tag() {
        let event = LiveEvent::Announcement {
            message: "Doors open".to_string(),
            at: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"announcement","message":"Doors open","at":1700000000000}"#
        );
    }
}
