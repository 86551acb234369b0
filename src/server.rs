//! HTTP boundary — webhook intake.
//!
//! The boundary owns exactly one contract: parse the body, hand the
//! payload to the dispatcher, and acknowledge immediately. Dispatch
//! outcome never reaches the response; HubSpot retries on timeouts, so
//! the ack must not wait on workflow execution.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::router::Dispatcher;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the Axum router with webhook and health routes.
pub fn app(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook/hubspot", post(hubspot_webhook))
        .route("/webhook/slack", post(slack_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { dispatcher })
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bdr-assist",
    }))
}

// ── HubSpot webhook ─────────────────────────────────────────────────

/// POST /webhook/hubspot
///
/// Accepts one event payload per call. A body that does not parse as
/// JSON is a transport-level failure: it returns 500 and never reaches
/// the dispatcher. Anything that parses is acknowledged with 200 and
/// processed in the background, whatever its content.
async fn hubspot_webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Failed to parse HubSpot webhook body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"detail": "Failed to process webhook"})),
            );
        }
    };

    info!(
        subscription_type = payload
            .get("subscriptionType")
            .and_then(|v| v.as_str())
            .unwrap_or("<missing>"),
        "Received HubSpot webhook"
    );

    Arc::clone(&state.dispatcher).dispatch(payload);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "received",
            "message": "Webhook processing started",
        })),
    )
}

// ── Slack webhook ───────────────────────────────────────────────────

/// POST /webhook/slack
///
/// Acknowledges Slack callbacks (slash commands, button clicks).
// TODO: route Slack interactions once the Slack app has interactive
// components configured; today only the error channel is used.
async fn slack_webhook(body: Bytes) -> impl IntoResponse {
    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Failed to parse Slack webhook body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"detail": "Failed to process Slack webhook"})),
            );
        }
    };

    info!(
        event_type = payload
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("<missing>"),
        "Received Slack webhook"
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "received",
            "message": "Slack event received",
        })),
    )
}
