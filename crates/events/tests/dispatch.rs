//! Integration tests for notification dispatch over the event bus.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use cnec_core::alimtalk::NotificationEvent;
use cnec_events::{
    AlimtalkError, AlimtalkGateway, AlimtalkMessage, AlimtalkReceipt, ChannelResult, EmailError,
    EmailSender, EventBus, MarketplaceEvent, NotificationDispatcher,
};

// ---------------------------------------------------------------------------
// Test channels
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingGateway {
    sent: Mutex<Vec<AlimtalkMessage>>,
    fail: bool,
}

#[async_trait]
impl AlimtalkGateway for RecordingGateway {
    async fn send(&self, message: &AlimtalkMessage) -> Result<AlimtalkReceipt, AlimtalkError> {
        if self.fail {
            return Err(AlimtalkError::Rejected {
                status: 200,
                code: "400".into(),
                message: "template mismatch".into(),
            });
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(AlimtalkReceipt {
            uid: Some("uid-1".into()),
            cid: format!("cnec_{}", self.sent.lock().unwrap().len()),
        })
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

fn selected_event() -> MarketplaceEvent {
    MarketplaceEvent::new(NotificationEvent::CampaignSelected)
        .to("010-1234-5678", "Mina")
        .with_param("크리에이터명", "Mina")
        .with_param("캠페인명", "Glow Serum")
        .with_email("mina@example.com")
}

// ---------------------------------------------------------------------------
// dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dispatch_renders_template_and_sends_both_channels() {
    let gateway = Arc::new(RecordingGateway::default());
    let mailer = Arc::new(RecordingMailer::default());
    let dispatcher = NotificationDispatcher::new()
        .with_alimtalk(gateway.clone())
        .with_email(mailer.clone());

    let report = dispatcher.dispatch(&selected_event()).await;

    assert_eq!(report.template_code, "025100001011");
    assert!(report.alimtalk.is_sent());
    assert!(report.email.is_sent());

    let sent = gateway.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].template_code, "025100001011");
    assert_eq!(sent[0].receiver_num, "01012345678");
    assert!(sent[0].content.contains("Mina"));
    assert!(sent[0].content.contains("Glow Serum"));
    assert!(!sent[0].content.contains("#{"));

    let mails = mailer.sent.lock().unwrap();
    assert_eq!(mails[0].0, "mina@example.com");
    assert_eq!(mails[0].2, sent[0].content);
}

#[tokio::test]
async fn missing_parameters_fail_without_contacting_gateway() {
    let gateway = Arc::new(RecordingGateway::default());
    let dispatcher = NotificationDispatcher::new().with_alimtalk(gateway.clone());

    let event = MarketplaceEvent::new(NotificationEvent::CampaignSelected)
        .to("01012345678", "Mina")
        .with_param("크리에이터명", "Mina");
    let report = dispatcher.dispatch(&event).await;

    assert_matches!(report.alimtalk, ChannelResult::Failed(ref m) if m.contains("캠페인명"));
    assert!(gateway.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn gateway_failure_is_recorded_and_email_still_sent() {
    let gateway = Arc::new(RecordingGateway {
        fail: true,
        ..Default::default()
    });
    let mailer = Arc::new(RecordingMailer::default());
    let dispatcher = NotificationDispatcher::new()
        .with_alimtalk(gateway)
        .with_email(mailer.clone());

    let report = dispatcher.dispatch(&selected_event()).await;

    assert_matches!(report.alimtalk, ChannelResult::Failed(ref m) if m.contains("template mismatch"));
    assert!(report.email.is_sent());
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unconfigured_channels_are_skipped() {
    let report = NotificationDispatcher::new().dispatch(&selected_event()).await;
    assert_matches!(report.alimtalk, ChannelResult::Skipped(_));
    assert_matches!(report.email, ChannelResult::Skipped(_));

    let gateway = Arc::new(RecordingGateway::default());
    let no_receiver = MarketplaceEvent::new(NotificationEvent::CampaignSelected)
        .with_param("크리에이터명", "Mina")
        .with_param("캠페인명", "Glow Serum");
    let report = NotificationDispatcher::new()
        .with_alimtalk(gateway.clone())
        .dispatch(&no_receiver)
        .await;
    assert_eq!(
        report.alimtalk,
        ChannelResult::Skipped("no receiver number".into())
    );
    assert!(gateway.sent.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_delivers_published_events_until_bus_closes() {
    let gateway = Arc::new(RecordingGateway::default());
    let dispatcher = NotificationDispatcher::new().with_alimtalk(gateway.clone());

    let bus = EventBus::default();
    let handle = tokio::spawn(dispatcher.run(bus.subscribe()));

    bus.publish(selected_event());
    bus.publish(
        MarketplaceEvent::new(NotificationEvent::Signup)
            .to("010-9999-0000", "Brand Co")
            .with_param("회원명", "Brand Co"),
    );
    drop(bus);

    handle.await.expect("dispatcher task should finish cleanly");

    let sent = gateway.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].template_code, "025100000912");
    assert_eq!(sent[1].receiver_num, "01099990000");
}
