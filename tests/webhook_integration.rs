//! Integration tests for the webhook → dispatch path.
//!
//! Each test spins up the Axum server on a random port and posts real
//! HTTP requests at it. Workflow handlers and the error sink are
//! recording stubs wired to channels so the tests can await background
//! dispatch deterministically.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::{Notify, mpsc};
use tokio::time::timeout;

use bdr_assist::error::{IntegrationError, WorkflowError};
use bdr_assist::router::{
    Dispatcher, ErrorReporter, ErrorSink, HandlerRegistry, RoutingTable, WorkflowKind,
};
use bdr_assist::server::app;
use bdr_assist::workflows::WorkflowHandler;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait when asserting that nothing was invoked.
const QUIET_PERIOD: Duration = Duration::from_millis(200);

// ── Stub capabilities ───────────────────────────────────────────────

struct RecordingHandler {
    name: &'static str,
    invocations: mpsc::UnboundedSender<(&'static str, String)>,
}

#[async_trait]
impl WorkflowHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        self.name
    }
    async fn run(&self, subject_id: &str) -> Result<(), WorkflowError> {
        self.invocations.send((self.name, subject_id.to_string())).ok();
        Ok(())
    }
}

/// Signals when it starts, then blocks until released.
struct BlockingHandler {
    started: mpsc::UnboundedSender<()>,
    release: Arc<Notify>,
}

#[async_trait]
impl WorkflowHandler for BlockingHandler {
    fn name(&self) -> &'static str {
        "enrich"
    }
    async fn run(&self, _subject_id: &str) -> Result<(), WorkflowError> {
        self.started.send(()).ok();
        self.release.notified().await;
        Ok(())
    }
}

struct FailingHandler;

#[async_trait]
impl WorkflowHandler for FailingHandler {
    fn name(&self) -> &'static str {
        "enrich"
    }
    async fn run(&self, _subject_id: &str) -> Result<(), WorkflowError> {
        Err(WorkflowError::Failed {
            name: "enrich".to_string(),
            reason: "CRM unavailable".to_string(),
        })
    }
}

struct RecordingSink {
    notifications: mpsc::UnboundedSender<(String, Value)>,
}

#[async_trait]
impl ErrorSink for RecordingSink {
    async fn notify(&self, message: &str, context: Value) -> Result<(), IntegrationError> {
        self.notifications.send((message.to_string(), context)).ok();
        Ok(())
    }
}

struct FailingSink;

#[async_trait]
impl ErrorSink for FailingSink {
    async fn notify(&self, _message: &str, _context: Value) -> Result<(), IntegrationError> {
        Err(IntegrationError::RequestFailed {
            service: "slack".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

// ── Server setup ────────────────────────────────────────────────────

fn recording_registry(
    invocations: mpsc::UnboundedSender<(&'static str, String)>,
) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for (kind, name) in [
        (WorkflowKind::Enrich, "enrich"),
        (WorkflowKind::Draft, "draft"),
        (WorkflowKind::Followup, "followup"),
        (WorkflowKind::Prep, "prep"),
    ] {
        registry.register(
            kind,
            Arc::new(RecordingHandler {
                name,
                invocations: invocations.clone(),
            }),
        );
    }
    registry
}

async fn start_server(registry: HandlerRegistry, sink: Arc<dyn ErrorSink>) -> u16 {
    let dispatcher = Arc::new(Dispatcher::new(
        RoutingTable::hubspot_defaults(),
        registry,
        ErrorReporter::new(sink),
    ));
    let router = app(dispatcher);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    port
}

async fn post_webhook(port: u16, payload: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/webhook/hubspot"))
        .json(payload)
        .send()
        .await
        .expect("webhook POST failed")
}

// ── Routing scenarios ───────────────────────────────────────────────

#[tokio::test]
async fn contact_creation_invokes_enrich() {
    timeout(TEST_TIMEOUT, async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (sink_tx, _sink_rx) = mpsc::unbounded_channel();
        let port = start_server(
            recording_registry(tx),
            Arc::new(RecordingSink {
                notifications: sink_tx,
            }),
        )
        .await;

        let response = post_webhook(
            port,
            &json!({"subscriptionType": "contact.creation", "objectId": "42"}),
        )
        .await;
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "received");

        assert_eq!(rx.recv().await, Some(("enrich", "42".to_string())));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn lead_status_change_invokes_draft() {
    timeout(TEST_TIMEOUT, async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let port = start_server(recording_registry(tx), Arc::new(FailingSink)).await;

        post_webhook(
            port,
            &json!({
                "subscriptionType": "contact.propertyChange",
                "objectId": "42",
                "propertyName": "hs_lead_status",
            }),
        )
        .await;

        assert_eq!(rx.recv().await, Some(("draft", "42".to_string())));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn dealstage_change_invokes_prep() {
    timeout(TEST_TIMEOUT, async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let port = start_server(recording_registry(tx), Arc::new(FailingSink)).await;

        post_webhook(
            port,
            &json!({
                "subscriptionType": "deal.propertyChange",
                "objectId": "99",
                "propertyName": "dealstage",
            }),
        )
        .await;

        assert_eq!(rx.recv().await, Some(("prep", "99".to_string())));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unrouted_events_invoke_nothing() {
    timeout(TEST_TIMEOUT, async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
        let port = start_server(
            recording_registry(tx),
            Arc::new(RecordingSink {
                notifications: sink_tx,
            }),
        )
        .await;

        for payload in [
            json!({
                "subscriptionType": "contact.propertyChange",
                "objectId": "42",
                "propertyName": "favorite_color",
            }),
            json!({
                "subscriptionType": "deal.propertyChange",
                "objectId": "99",
                "propertyName": "amount",
            }),
            json!({"subscriptionType": "company.creation", "objectId": "7"}),
            json!({"subscriptionType": "contact.creation"}),
            json!({}),
        ] {
            let response = post_webhook(port, &payload).await;
            // Still acknowledged — drops are invisible to the source.
            assert_eq!(response.status(), 200);
        }

        tokio::time::sleep(QUIET_PERIOD).await;
        assert!(rx.try_recv().is_err(), "no workflow should have run");
        assert!(sink_rx.try_recv().is_err(), "no error should be reported");
    })
    .await
    .expect("test timed out");
}

// ── Acknowledgment semantics ────────────────────────────────────────

#[tokio::test]
async fn ack_returns_while_handler_still_running() {
    timeout(TEST_TIMEOUT, async {
        let (started_tx, mut started_rx) = mpsc::unbounded_channel();
        let release = Arc::new(Notify::new());

        let mut registry = HandlerRegistry::new();
        registry.register(
            WorkflowKind::Enrich,
            Arc::new(BlockingHandler {
                started: started_tx,
                release: Arc::clone(&release),
            }),
        );
        let port = start_server(registry, Arc::new(FailingSink)).await;

        let response = post_webhook(
            port,
            &json!({"subscriptionType": "contact.creation", "objectId": "42"}),
        )
        .await;

        // The ack arrived while the handler is still blocked.
        assert_eq!(response.status(), 200);
        started_rx.recv().await.expect("handler never started");
        release.notify_one();
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn malformed_body_returns_500_without_dispatch() {
    timeout(TEST_TIMEOUT, async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let port = start_server(recording_registry(tx), Arc::new(FailingSink)).await;

        let response = reqwest::Client::new()
            .post(format!("http://127.0.0.1:{port}/webhook/hubspot"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 500);

        tokio::time::sleep(QUIET_PERIOD).await;
        assert!(rx.try_recv().is_err());
    })
    .await
    .expect("test timed out");
}

// ── Failure reporting ───────────────────────────────────────────────

#[tokio::test]
async fn handler_failure_acks_then_notifies_sink() {
    timeout(TEST_TIMEOUT, async {
        let (sink_tx, mut sink_rx) = mpsc::unbounded_channel();
        let mut registry = HandlerRegistry::new();
        registry.register(WorkflowKind::Enrich, Arc::new(FailingHandler));
        let port = start_server(
            registry,
            Arc::new(RecordingSink {
                notifications: sink_tx,
            }),
        )
        .await;

        let payload = json!({"subscriptionType": "contact.creation", "objectId": "42"});
        let response = post_webhook(port, &payload).await;
        // Source already acknowledged; the failure is internal.
        assert_eq!(response.status(), 200);

        let (message, context) = sink_rx.recv().await.expect("sink never notified");
        assert!(message.contains("CRM unavailable"));
        assert_eq!(context["payload"], payload);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn sink_failure_does_not_poison_the_server() {
    timeout(TEST_TIMEOUT, async {
        let mut registry = HandlerRegistry::new();
        registry.register(WorkflowKind::Enrich, Arc::new(FailingHandler));
        let port = start_server(registry, Arc::new(FailingSink)).await;

        // Handler fails, then the sink fails too — both swallowed.
        let payload = json!({"subscriptionType": "contact.creation", "objectId": "42"});
        assert_eq!(post_webhook(port, &payload).await.status(), 200);

        // Server keeps serving.
        tokio::time::sleep(QUIET_PERIOD).await;
        assert_eq!(post_webhook(port, &payload).await.status(), 200);
    })
    .await
    .expect("test timed out");
}

// ── Other endpoints ─────────────────────────────────────────────────

#[tokio::test]
async fn health_check_reports_healthy() {
    timeout(TEST_TIMEOUT, async {
        let (tx, _rx) = mpsc::unbounded_channel();
        let port = start_server(recording_registry(tx), Arc::new(FailingSink)).await;

        let response = reqwest::get(format!("http://127.0.0.1:{port}/"))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn slack_webhook_is_acknowledged() {
    timeout(TEST_TIMEOUT, async {
        let (tx, _rx) = mpsc::unbounded_channel();
        let port = start_server(recording_registry(tx), Arc::new(FailingSink)).await;

        let response = reqwest::Client::new()
            .post(format!("http://127.0.0.1:{port}/webhook/slack"))
            .json(&json!({"type": "url_verification"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "received");
    })
    .await
    .expect("test timed out");
}
