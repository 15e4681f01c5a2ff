//! Training notifications end to end: bus -> notifier -> Resend stub.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use headshots_events::delivery::email::{EmailMessage, EmailTransport, ResendTransport};
use headshots_events::{EmailDelivery, EmailError, EventBus, PlatformEvent, TrainingNotifier};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

#[async_trait]
impl EmailTransport for Recorder {
    async fn send(&self, _from: &str, message: &EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

fn completed(tune_id: &str, email: Option<&str>) -> PlatformEvent {
    PlatformEvent::new(headshots_events::TUNE_COMPLETED)
        .with_source("tune", tune_id)
        .with_actor(Uuid::new_v4())
        .with_payload(json!({ "notify_email": email, "user_name": "Sam" }))
}

#[tokio::test]
async fn resend_receives_ready_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test"))
        .and(body_partial_json(json!({
            "from": "Headshots <hi@example.com>",
            "to": ["sam@example.com"],
            "subject": "Your AI headshot model is ready"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "email_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let delivery = EmailDelivery::with_transport(
        Box::new(ResendTransport::new("re_test", server.uri())),
        "Headshots <hi@example.com>",
    );
    delivery
        .send_training_ready("sam@example.com", "http://localhost:5173", "1504944", Some("Sam"))
        .await
        .unwrap();
}

#[tokio::test]
async fn resend_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(403).set_body_string("domain not verified"))
        .mount(&server)
        .await;

    let delivery = EmailDelivery::with_transport(
        Box::new(ResendTransport::new("re_test", server.uri())),
        "Headshots <hi@example.com>",
    );
    let err = delivery
        .send_training_ready("sam@example.com", "http://localhost:5173", "1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EmailError::Api { status: 403, .. }));
}

#[tokio::test]
async fn notifier_only_mails_completed_tunes_with_address() {
    let recorder = Recorder::default();
    let delivery = Arc::new(EmailDelivery::with_transport(
        Box::new(recorder.clone()),
        "Headshots <hi@example.com>",
    ));
    let notifier = TrainingNotifier::new(delivery, "https://headshots.example.com");

    assert!(notifier.handle(&completed("1504944", Some("sam@example.com"))).await);
    assert!(!notifier.handle(&completed("1504945", None)).await);
    assert!(
        !notifier
            .handle(&PlatformEvent::new(headshots_events::TUNE_FAILED).with_source("tune", "9"))
            .await
    );

    let sent = recorder.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .html
        .contains("https://headshots.example.com/dashboard/tunes/1504944"));
}

#[tokio::test]
async fn notifier_loop_stops_on_cancel() {
    let recorder = Recorder::default();
    let delivery = Arc::new(EmailDelivery::with_transport(
        Box::new(recorder.clone()),
        "Headshots <hi@example.com>",
    ));
    let notifier = TrainingNotifier::new(delivery, "http://localhost:5173");
    let bus = EventBus::default();
    let cancel = CancellationToken::new();

    let rx = bus.subscribe();
    let token = cancel.clone();
    let handle = tokio::spawn(async move { notifier.run(rx, token).await });

    bus.publish(completed("1504944", Some("sam@example.com")));
    for _ in 0..50 {
        if !recorder.sent.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(recorder.sent.lock().unwrap().len(), 1);
}
