//! Shared types for the event router.

use serde::{Deserialize, Serialize};

// ── Webhook event ───────────────────────────────────────────────────

/// A HubSpot webhook event, kept exactly as received.
///
/// No schema is assumed beyond three extractable fields: the
/// `subscriptionType` discriminator, the `objectId` of the contact or
/// deal the event concerns, and (for property-change events) the
/// `propertyName` that changed. Everything else is preserved untouched
/// so failure reports can carry the full original payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent(serde_json::Value);

impl WebhookEvent {
    pub fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    /// The raw payload as received.
    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_payload(self) -> serde_json::Value {
        self.0
    }

    /// The `subscriptionType` discriminator. Empty strings count as absent.
    pub fn subscription_type(&self) -> Option<&str> {
        self.0
            .get("subscriptionType")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// The `objectId` of the subject, normalized to a string.
    ///
    /// HubSpot sends numeric ids in webhook payloads but string ids in
    /// API responses; both forms are accepted here.
    pub fn object_id(&self) -> Option<String> {
        match self.0.get("objectId") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The `propertyName` that changed, for property-change events.
    pub fn property_name(&self) -> Option<&str> {
        self.0
            .get("propertyName")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

impl From<serde_json::Value> for WebhookEvent {
    fn from(payload: serde_json::Value) -> Self {
        Self::new(payload)
    }
}

// ── Classification ──────────────────────────────────────────────────

/// Routing decision input: what kind of event this is and which subject
/// it concerns. Produced once per event, transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A new contact was created.
    ContactCreated { contact_id: String },
    /// A contact property changed. `property` is absent when the payload
    /// omitted `propertyName` — that falls through to the unrouted branch.
    ContactPropertyChanged {
        contact_id: String,
        property: Option<String>,
    },
    /// A deal property changed.
    DealPropertyChanged {
        deal_id: String,
        property: Option<String>,
    },
    /// Unknown or absent `subscriptionType` — expected noise, not a fault.
    Unrecognized { subscription_type: Option<String> },
}

impl Classification {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ContactCreated { .. } => "contact_created",
            Self::ContactPropertyChanged { .. } => "contact_property_changed",
            Self::DealPropertyChanged { .. } => "deal_property_changed",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

// ── Dispatch outcome ────────────────────────────────────────────────

/// Why an event was dropped without invoking a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Payload had no usable `subscriptionType`.
    MissingSubscriptionType,
    /// A recognized category was missing its subject identifier.
    MissingObjectId { subscription_type: String },
    /// `subscriptionType` matched no known category.
    UnrecognizedSubscriptionType { subscription_type: String },
    /// Contact property with no routing rule (including absent).
    UnroutedContactProperty {
        contact_id: String,
        property: Option<String>,
    },
    /// Deal property with no routing rule.
    UnroutedDealProperty {
        deal_id: String,
        property: Option<String>,
    },
}

/// Terminal state of one `handle` call. Used for logging and tests only;
/// the webhook source has already been acknowledged by the time this
/// exists and never sees it.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A handler ran to completion.
    Completed { workflow: &'static str },
    /// No handler was invoked. Expected traffic, not a fault.
    Dropped { reason: DropReason },
    /// The handler (or the registry) failed; the error sink was notified.
    Failed {
        workflow: Option<&'static str>,
        error: String,
    },
}

impl DispatchOutcome {
    /// Whether a handler ran to completion.
    pub fn handled(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Name of the workflow that was invoked, if any.
    pub fn handler_name(&self) -> Option<&'static str> {
        match self {
            Self::Completed { workflow } => Some(workflow),
            Self::Failed { workflow, .. } => *workflow,
            Self::Dropped { .. } => None,
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::Dropped { .. } => "dropped",
            Self::Failed { .. } => "failed",
        }
    }
}
