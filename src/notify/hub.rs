//! Broadcast hub for real-time mail events.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::mail::Email;

/// Default number of buffered events per subscriber.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event pushed to connected listeners.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum MailEvent {
    /// A new email was stored.
    EmailReceived(Email),
}

/// Fan-out of [`MailEvent`]s to every subscriber.
///
/// Delivery is at-most-once: a subscriber that falls more than the channel
/// capacity behind skips the oldest events, and nothing is replayed to late
/// subscribers.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<MailEvent>,
}

impl NotificationHub {
    /// Create a hub buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event. Never blocks and never fails.
    ///
    /// Returns the number of subscribers that will see the event.
    pub fn publish(&self, event: MailEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(_) => {
                tracing::debug!("No subscribers, mail event dropped");
                0
            }
        }
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MailEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
