//! Workflow handlers triggered by routed CRM events.
//!
//! Each workflow is an independent, asynchronous unit of work that takes
//! a subject id (contact or deal) and performs its effects against the
//! external integrations. The router only sees the [`WorkflowHandler`]
//! capability; what a workflow actually does lives here.

pub mod draft;
pub mod enrich;
pub mod followup;
pub mod prep;

pub use draft::DraftWorkflow;
pub use enrich::EnrichWorkflow;
pub use followup::FollowupWorkflow;
pub use prep::PrepWorkflow;

use async_trait::async_trait;

use crate::error::WorkflowError;
use crate::integrations::CrmRecord;

/// A named, asynchronous unit of workflow logic.
///
/// Invocations are independent: no state is carried between calls, and
/// concurrent invocations for the same subject are allowed (the router
/// gives no ordering guarantee).
#[async_trait]
pub trait WorkflowHandler: Send + Sync {
    /// Stable workflow name for logs and error reports.
    fn name(&self) -> &'static str;

    /// Run the workflow for one subject.
    async fn run(&self, subject_id: &str) -> Result<(), WorkflowError>;
}

/// Best display name for a contact: full name, then email, then the id.
pub(crate) fn contact_display_name(contact: &CrmRecord) -> String {
    let first = contact.property("firstname");
    let last = contact.property("lastname");
    match (first, last) {
        (Some(f), Some(l)) => format!("{f} {l}"),
        (Some(f), None) => f.to_string(),
        (None, Some(l)) => l.to_string(),
        (None, None) => contact
            .property("email")
            .map(String::from)
            .unwrap_or_else(|| format!("contact {}", contact.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn contact(properties: &[(&str, &str)]) -> CrmRecord {
        CrmRecord {
            id: "42".to_string(),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        let record = contact(&[
            ("firstname", "Ada"),
            ("lastname", "Lovelace"),
            ("email", "ada@example.com"),
        ]);
        assert_eq!(contact_display_name(&record), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_email_then_id() {
        let record = contact(&[("email", "ada@example.com")]);
        assert_eq!(contact_display_name(&record), "ada@example.com");

        let record = contact(&[]);
        assert_eq!(contact_display_name(&record), "contact 42");
    }
}
