//! The event router: classification, routing table, dispatch, and
//! failure reporting.
//!
//! An inbound webhook event enters through [`Dispatcher::dispatch`], is
//! classified, resolved against the [`RoutingTable`], and its workflow
//! runs on a background task. Failures anywhere in the chain are caught,
//! logged, and forwarded to the [`ErrorSink`] — never back to the event
//! source.

pub mod classifier;
pub mod dispatcher;
pub mod event;
pub mod registry;
pub mod reporter;

pub use classifier::classify;
pub use dispatcher::Dispatcher;
pub use event::{Classification, DispatchOutcome, DropReason, WebhookEvent};
pub use registry::{HandlerRegistry, PropertyRule, RouteDecision, RoutingTable, WorkflowKind};
pub use reporter::{ErrorReporter, ErrorSink};
