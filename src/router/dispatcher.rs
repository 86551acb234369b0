//! Event dispatch — classification, routing, and background execution.
//!
//! Flow for one webhook event:
//! 1. Classify the raw payload (pure, no I/O)
//! 2. Resolve a workflow through the routing table
//! 3. Invoke the handler with the subject id
//! 4. Catch any failure, log it, and forward it to the error reporter
//!
//! `handle` is infallible: every path ends in a [`DispatchOutcome`], and
//! nothing propagates back to the webhook boundary — the source was
//! acknowledged before any of this ran.

use std::sync::Arc;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::router::classifier::classify;
use crate::router::event::{DispatchOutcome, DropReason, WebhookEvent};
use crate::router::registry::{HandlerRegistry, RouteDecision, RoutingTable};
use crate::router::reporter::ErrorReporter;

/// Routes inbound events to workflow handlers.
///
/// Holds only read-only state, so a single instance is shared across all
/// concurrent dispatches. Events for the same subject may execute in any
/// order or overlap; no cross-event locking or deduplication is done.
pub struct Dispatcher {
    table: RoutingTable,
    registry: HandlerRegistry,
    reporter: ErrorReporter,
}

impl Dispatcher {
    pub fn new(table: RoutingTable, registry: HandlerRegistry, reporter: ErrorReporter) -> Self {
        Self {
            table,
            registry,
            reporter,
        }
    }

    /// Submit an event for background processing and return immediately.
    ///
    /// The webhook boundary calls this and sends its acknowledgment
    /// without waiting; the returned handle is for tests and shutdown
    /// accounting, not for the dispatch path.
    pub fn dispatch(self: Arc<Self>, payload: serde_json::Value) -> tokio::task::JoinHandle<DispatchOutcome> {
        tokio::spawn(async move { self.handle(payload).await })
    }

    /// Process one event to a terminal state. Never returns an error and
    /// never panics on malformed input.
    pub async fn handle(&self, payload: serde_json::Value) -> DispatchOutcome {
        let dispatch_id = Uuid::new_v4();
        let event = WebhookEvent::new(payload);

        let classification = match classify(&event) {
            Ok(classification) => classification,
            // Malformed envelope: already error-logged by the classifier.
            // Expected noise from partial/test events — drop without a report.
            Err(crate::error::ClassifyError::MissingObjectId { subscription_type }) => {
                return DispatchOutcome::Dropped {
                    reason: DropReason::MissingObjectId { subscription_type },
                };
            }
        };

        info!(
            %dispatch_id,
            event = classification.label(),
            "Routing event"
        );

        let (workflow, subject) = match self.table.route(&classification) {
            RouteDecision::Dispatch { workflow, subject } => (workflow, subject),
            RouteDecision::Skip { reason } => {
                log_drop(&reason);
                return DispatchOutcome::Dropped { reason };
            }
        };

        let Some(handler) = self.registry.get(workflow) else {
            let message = format!("No handler registered for workflow {}", workflow.name());
            error!(%dispatch_id, workflow = workflow.name(), "{message}");
            self.reporter.report(&message, event.payload()).await;
            return DispatchOutcome::Failed {
                workflow: Some(workflow.name()),
                error: message,
            };
        };

        info!(
            %dispatch_id,
            workflow = handler.name(),
            subject = %subject,
            "Invoking workflow"
        );

        match handler.run(&subject).await {
            Ok(()) => {
                debug!(%dispatch_id, workflow = handler.name(), "Workflow completed");
                DispatchOutcome::Completed {
                    workflow: handler.name(),
                }
            }
            Err(e) => {
                let message = format!("Error routing event: {e}");
                error!(
                    %dispatch_id,
                    workflow = handler.name(),
                    subject = %subject,
                    error = %e,
                    payload = %event.payload(),
                    "Workflow failed"
                );
                self.reporter.report(&message, event.payload()).await;
                DispatchOutcome::Failed {
                    workflow: Some(handler.name()),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// One log line per dropped event. The unrecognized and missing-type
/// cases were already warned about by the classifier.
fn log_drop(reason: &DropReason) {
    match reason {
        DropReason::UnroutedContactProperty {
            contact_id,
            property,
        } => {
            info!(
                contact_id = %contact_id,
                property = property.as_deref().unwrap_or("<absent>"),
                "Unhandled contact property change"
            );
        }
        DropReason::UnroutedDealProperty { deal_id, property } => {
            info!(
                deal_id = %deal_id,
                property = property.as_deref().unwrap_or("<absent>"),
                "Unhandled deal property change"
            );
        }
        DropReason::MissingSubscriptionType
        | DropReason::MissingObjectId { .. }
        | DropReason::UnrecognizedSubscriptionType { .. } => {}
    }
}
