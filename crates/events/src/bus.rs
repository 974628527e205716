//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`MarketplaceEvent`]s. It
//! is shared via `Arc<EventBus>`; request handlers publish and return
//! without waiting for delivery.

use std::collections::HashMap;

use chrono::Utc;
use cnec_core::alimtalk::NotificationEvent;
use cnec_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// MarketplaceEvent
// ---------------------------------------------------------------------------

/// A business event addressed to a single recipient.
///
/// Constructed via [`MarketplaceEvent::new`] and filled in with
/// [`to`](MarketplaceEvent::to), [`with_param`](MarketplaceEvent::with_param)
/// and [`with_email`](MarketplaceEvent::with_email).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceEvent {
    pub event: NotificationEvent,

    /// Recipient phone number. Without one, no alimtalk is sent.
    pub receiver_num: Option<String>,

    pub receiver_name: Option<String>,

    /// Template parameter values, keyed by parameter name.
    pub params: HashMap<String, String>,

    /// Recipient email address. Without one, no email is sent.
    pub email: Option<String>,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl MarketplaceEvent {
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            event,
            receiver_num: None,
            receiver_name: None,
            params: HashMap::new(),
            email: None,
            timestamp: Utc::now(),
        }
    }

    /// Address the event to a phone number.
    pub fn to(mut self, receiver_num: impl Into<String>, receiver_name: impl Into<String>) -> Self {
        self.receiver_num = Some(receiver_num.into());
        self.receiver_name = Some(receiver_name.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use cnec_core::alimtalk::NotificationEvent;
/// use cnec_events::bus::{EventBus, MarketplaceEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(MarketplaceEvent::new(NotificationEvent::Signup));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<MarketplaceEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: MarketplaceEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MarketplaceEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            MarketplaceEvent::new(NotificationEvent::CampaignSelected)
                .to("010-1234-5678", "Mina")
                .with_param("크리에이터명", "Mina")
                .with_email("mina@example.com"),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event, NotificationEvent::CampaignSelected);
        assert_eq!(received.receiver_num.as_deref(), Some("010-1234-5678"));
        assert_eq!(received.receiver_name.as_deref(), Some("Mina"));
        assert_eq!(received.params["크리에이터명"], "Mina");
        assert_eq!(received.email.as_deref(), Some("mina@example.com"));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(MarketplaceEvent::new(NotificationEvent::Signup));

        assert_eq!(rx1.recv().await.unwrap().event, NotificationEvent::Signup);
        assert_eq!(rx2.recv().await.unwrap().event, NotificationEvent::Signup);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(MarketplaceEvent::new(NotificationEvent::VideoApproved));
    }

    #[test]
    fn event_deserializes_from_wire_name() {
        let event: MarketplaceEvent = serde_json::from_value(serde_json::json!({
            "event": "video_deadline_3days",
            "receiver_num": null,
            "receiver_name": null,
            "params": {},
            "email": null,
            "timestamp": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(event.event, NotificationEvent::VideoDeadline3Days);
    }
}
