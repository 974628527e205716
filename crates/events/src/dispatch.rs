//! Event-to-notification dispatch.
//!
//! [`NotificationDispatcher`] subscribes to the event bus and, for each
//! [`MarketplaceEvent`], renders the event's template and delivers it over
//! alimtalk and email. Delivery failures are logged and recorded; they never
//! propagate to whoever published the event.

use std::collections::HashMap;
use std::sync::Arc;

use cnec_core::alimtalk::{self, NotificationEvent};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::bus::MarketplaceEvent;
use crate::delivery::alimtalk::{AlimtalkGateway, AlimtalkMessage};
use crate::delivery::email::EmailSender;

/// What happened on one delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ChannelResult {
    Sent(String),
    Skipped(String),
    Failed(String),
}

impl ChannelResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, ChannelResult::Sent(_))
    }
}

/// Per-channel outcome of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub event: NotificationEvent,
    pub template_code: &'static str,
    pub alimtalk: ChannelResult,
    pub email: ChannelResult,
}

/// Delivers marketplace events to their recipients.
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    alimtalk: Option<Arc<dyn AlimtalkGateway>>,
    email: Option<Arc<dyn EmailSender>>,
}

impl NotificationDispatcher {
    /// A dispatcher with no channels; every delivery is skipped.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alimtalk(mut self, gateway: Arc<dyn AlimtalkGateway>) -> Self {
        self.alimtalk = Some(gateway);
        self
    }

    pub fn with_email(mut self, sender: Arc<dyn EmailSender>) -> Self {
        self.email = Some(sender);
        self
    }

    /// Run the dispatch loop until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<MarketplaceEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.dispatch(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Render and deliver one event. Never fails; see the returned report.
    pub async fn dispatch(&self, event: &MarketplaceEvent) -> DispatchReport {
        let template = alimtalk::template_for(event.event);

        let values: HashMap<String, String> = match alimtalk::bind(template, &event.params) {
            Ok(bound) => bound.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            Err(e) => {
                tracing::warn!(
                    event = ?event.event,
                    template_code = template.code,
                    error = %e,
                    "Notification not sent"
                );
                return DispatchReport {
                    event: event.event,
                    template_code: template.code,
                    alimtalk: ChannelResult::Failed(e.to_string()),
                    email: ChannelResult::Failed(e.to_string()),
                };
            }
        };
        let content = alimtalk::render(template.body, &values);

        let alimtalk = match (&self.alimtalk, &event.receiver_num) {
            (None, _) => ChannelResult::Skipped("alimtalk not configured".into()),
            (Some(_), None) => ChannelResult::Skipped("no receiver number".into()),
            (Some(gateway), Some(number)) => {
                let message = AlimtalkMessage::new(
                    template.code,
                    number,
                    event.receiver_name.clone().unwrap_or_default(),
                    content.clone(),
                );
                match gateway.send(&message).await {
                    Ok(receipt) => ChannelResult::Sent(receipt.cid),
                    Err(e) => {
                        tracing::error!(
                            event = ?event.event,
                            template_code = template.code,
                            error = %e,
                            "Alimtalk delivery failed"
                        );
                        ChannelResult::Failed(e.to_string())
                    }
                }
            }
        };

        let email = match (&self.email, &event.email) {
            (None, _) => ChannelResult::Skipped("email not configured".into()),
            (Some(_), None) => ChannelResult::Skipped("no email address".into()),
            (Some(sender), Some(to)) => {
                let subject = alimtalk::render(template.subject, &values);
                match sender.send(to, &subject, &content).await {
                    Ok(()) => ChannelResult::Sent(to.clone()),
                    Err(e) => {
                        tracing::error!(
                            event = ?event.event,
                            error = %e,
                            "Email delivery failed"
                        );
                        ChannelResult::Failed(e.to_string())
                    }
                }
            }
        };

        DispatchReport {
            event: event.event,
            template_code: template.code,
            alimtalk,
            email,
        }
    }
}
