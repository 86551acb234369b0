//! Event classification — the pure front half of the router.
//!
//! Maps a raw webhook payload onto a [`Classification`] without touching
//! any external system. Malformed input degrades to `Unrecognized` or a
//! [`ClassifyError`] dead-end; nothing here panics on bad payloads.

use tracing::{error, warn};

use crate::error::ClassifyError;
use crate::router::event::{Classification, WebhookEvent};

/// HubSpot subscription type for new contacts.
pub const CONTACT_CREATION: &str = "contact.creation";
/// HubSpot subscription type for contact property changes.
pub const CONTACT_PROPERTY_CHANGE: &str = "contact.propertyChange";
/// HubSpot subscription type for deal property changes.
pub const DEAL_PROPERTY_CHANGE: &str = "deal.propertyChange";

/// Classify a webhook event.
///
/// An unknown or absent `subscriptionType` is expected traffic and maps
/// to [`Classification::Unrecognized`]. A recognized type with no
/// `objectId` is a malformed envelope and maps to
/// [`ClassifyError::MissingObjectId`]; the caller drops the event
/// without reporting it.
pub fn classify(event: &WebhookEvent) -> Result<Classification, ClassifyError> {
    let Some(subscription_type) = event.subscription_type() else {
        warn!(payload = %event.payload(), "Webhook payload missing subscriptionType");
        return Ok(Classification::Unrecognized {
            subscription_type: None,
        });
    };

    match subscription_type {
        CONTACT_CREATION => {
            let contact_id = require_object_id(event, subscription_type)?;
            Ok(Classification::ContactCreated { contact_id })
        }
        CONTACT_PROPERTY_CHANGE => {
            let contact_id = require_object_id(event, subscription_type)?;
            Ok(Classification::ContactPropertyChanged {
                contact_id,
                property: event.property_name().map(String::from),
            })
        }
        DEAL_PROPERTY_CHANGE => {
            let deal_id = require_object_id(event, subscription_type)?;
            Ok(Classification::DealPropertyChanged {
                deal_id,
                property: event.property_name().map(String::from),
            })
        }
        other => {
            warn!(subscription_type = %other, "Unhandled subscription type");
            Ok(Classification::Unrecognized {
                subscription_type: Some(other.to_string()),
            })
        }
    }
}

fn require_object_id(
    event: &WebhookEvent,
    subscription_type: &str,
) -> Result<String, ClassifyError> {
    event.object_id().ok_or_else(|| {
        error!(
            subscription_type = %subscription_type,
            payload = %event.payload(),
            "Event missing objectId"
        );
        ClassifyError::MissingObjectId {
            subscription_type: subscription_type.to_string(),
        }
    })
}
