//! Declarative routing table and handler registry.
//!
//! The routing rules are data, not control flow: [`RoutingTable`] holds
//! the property → workflow rows and answers [`RouteDecision`]s without
//! knowing how workflows execute, so new rules can be added without
//! touching the dispatcher. [`HandlerRegistry`] binds each
//! [`WorkflowKind`] to its handler instance.

use std::collections::HashMap;
use std::sync::Arc;

use crate::router::event::{Classification, DropReason};
use crate::workflows::WorkflowHandler;

// ── Workflow kinds ──────────────────────────────────────────────────

/// The four downstream workflows an event can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    /// Enrich a newly created contact.
    Enrich,
    /// Draft outreach for a contact that became ready.
    Draft,
    /// Follow up on contact engagement.
    Followup,
    /// Prepare materials for a deal stage change.
    Prep,
}

impl WorkflowKind {
    /// Stable name used in logs and error reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enrich => "enrich",
            Self::Draft => "draft",
            Self::Followup => "followup",
            Self::Prep => "prep",
        }
    }
}

// ── Routing table ───────────────────────────────────────────────────

/// One routing row: a set of property names that map to a workflow.
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct PropertyRule {
    pub workflow: WorkflowKind,
    pub properties: Vec<String>,
}

impl PropertyRule {
    pub fn new(workflow: WorkflowKind, properties: &[&str]) -> Self {
        Self {
            workflow,
            properties: properties.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn matches(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }
}

/// Routing decision for a classified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Invoke `workflow` with `subject`.
    Dispatch {
        workflow: WorkflowKind,
        subject: String,
    },
    /// No handler for this event — drop it with the given reason.
    Skip { reason: DropReason },
}

/// The declarative category/property → workflow mapping.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    /// Workflow for every `contact.creation` event.
    contact_created: WorkflowKind,
    contact_property_rules: Vec<PropertyRule>,
    deal_property_rules: Vec<PropertyRule>,
}

impl RoutingTable {
    /// The HubSpot production routing rules.
    pub fn hubspot_defaults() -> Self {
        Self {
            contact_created: WorkflowKind::Enrich,
            contact_property_rules: vec![
                // Contact ready for outreach
                PropertyRule::new(
                    WorkflowKind::Draft,
                    &["lifecyclestage", "lead_status", "hs_lead_status"],
                ),
                // Contact engagement signals
                PropertyRule::new(
                    WorkflowKind::Followup,
                    &[
                        "notes_last_updated",
                        "engagement_last_updated",
                        "email_opened",
                        "email_clicked",
                    ],
                ),
            ],
            deal_property_rules: vec![PropertyRule::new(WorkflowKind::Prep, &["dealstage"])],
        }
    }

    /// Add a contact property rule (appended after the defaults).
    pub fn add_contact_rule(&mut self, rule: PropertyRule) {
        self.contact_property_rules.push(rule);
    }

    /// Add a deal property rule (appended after the defaults).
    pub fn add_deal_rule(&mut self, rule: PropertyRule) {
        self.deal_property_rules.push(rule);
    }

    /// Resolve a classification against the table.
    ///
    /// Pure data lookup: first matching rule wins, at most one workflow
    /// per event, no fallback matching on prefixes or case.
    pub fn route(&self, classification: &Classification) -> RouteDecision {
        match classification {
            Classification::ContactCreated { contact_id } => RouteDecision::Dispatch {
                workflow: self.contact_created,
                subject: contact_id.clone(),
            },
            Classification::ContactPropertyChanged {
                contact_id,
                property,
            } => Self::route_property(
                &self.contact_property_rules,
                contact_id,
                property.as_deref(),
                |contact_id, property| DropReason::UnroutedContactProperty {
                    contact_id,
                    property,
                },
            ),
            Classification::DealPropertyChanged { deal_id, property } => Self::route_property(
                &self.deal_property_rules,
                deal_id,
                property.as_deref(),
                |deal_id, property| DropReason::UnroutedDealProperty { deal_id, property },
            ),
            Classification::Unrecognized { subscription_type } => RouteDecision::Skip {
                reason: match subscription_type {
                    Some(t) => DropReason::UnrecognizedSubscriptionType {
                        subscription_type: t.clone(),
                    },
                    None => DropReason::MissingSubscriptionType,
                },
            },
        }
    }

    fn route_property(
        rules: &[PropertyRule],
        subject: &str,
        property: Option<&str>,
        unrouted: impl FnOnce(String, Option<String>) -> DropReason,
    ) -> RouteDecision {
        if let Some(property) = property {
            for rule in rules {
                if rule.matches(property) {
                    return RouteDecision::Dispatch {
                        workflow: rule.workflow,
                        subject: subject.to_string(),
                    };
                }
            }
        }
        RouteDecision::Skip {
            reason: unrouted(subject.to_string(), property.map(String::from)),
        }
    }
}

// ── Handler registry ────────────────────────────────────────────────

/// Binds workflow kinds to their handler instances.
///
/// Read-only after construction; safe to share across concurrent
/// dispatches behind an `Arc`.
pub struct HandlerRegistry {
    handlers: HashMap<WorkflowKind, Arc<dyn WorkflowHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for a workflow kind, replacing any previous one.
    pub fn register(&mut self, kind: WorkflowKind, handler: Arc<dyn WorkflowHandler>) {
        self.handlers.insert(kind, handler);
    }

    /// Look up the handler for a kind. `None` means a misconfigured
    /// registry — the dispatcher reports it rather than panicking.
    pub fn get(&self, kind: WorkflowKind) -> Option<Arc<dyn WorkflowHandler>> {
        self.handlers.get(&kind).cloned()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
