//! Failure reporting — best-effort notifications to an external sink.
//!
//! The reporter owns formatting; delivery goes through the [`ErrorSink`]
//! capability (Slack in production). Nothing here ever propagates an
//! error back onto the dispatch path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::error;

use crate::error::IntegrationError;

/// Delivery capability for failure notifications.
///
/// Implementations are pure I/O and must tolerate concurrent use. They
/// may fail or hang — the reporter treats delivery as best-effort and
/// never relies on it succeeding.
#[async_trait]
pub trait ErrorSink: Send + Sync {
    /// Deliver one failure notification with serializable context.
    async fn notify(
        &self,
        message: &str,
        context: serde_json::Value,
    ) -> Result<(), IntegrationError>;
}

/// Formats dispatch failures and forwards them to the sink.
pub struct ErrorReporter {
    sink: Arc<dyn ErrorSink>,
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self { sink }
    }

    /// Report a dispatch failure with the original payload attached.
    ///
    /// A sink failure is logged locally and swallowed; this function
    /// cannot fail.
    pub async fn report(&self, message: &str, payload: &serde_json::Value) {
        let context = serde_json::json!({
            "payload": payload,
            "reported_at": Utc::now().to_rfc3339(),
        });

        if let Err(e) = self.sink.notify(message, context).await {
            error!(error = %e, "Failed to deliver error notification");
        }
    }
}
