//! Contact enrichment workflow.
//!
//! Triggered when a new contact is created in HubSpot: pulls the record,
//! flags high-priority leads, and introduces the contact to the team
//! channel so a BDR can pick them up.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::WorkflowError;
use crate::integrations::{CrmRecord, HubSpotClient, SlackClient};
use crate::workflows::{WorkflowHandler, contact_display_name};

pub struct EnrichWorkflow {
    hubspot: Arc<HubSpotClient>,
    slack: Arc<SlackClient>,
    team_channel: String,
    high_priority_score: i64,
}

impl EnrichWorkflow {
    pub fn new(
        hubspot: Arc<HubSpotClient>,
        slack: Arc<SlackClient>,
        team_channel: impl Into<String>,
        high_priority_score: i64,
    ) -> Self {
        Self {
            hubspot,
            slack,
            team_channel: team_channel.into(),
            high_priority_score,
        }
    }
}

#[async_trait]
impl WorkflowHandler for EnrichWorkflow {
    fn name(&self) -> &'static str {
        "enrich"
    }

    async fn run(&self, contact_id: &str) -> Result<(), WorkflowError> {
        info!(contact_id, "Enrich workflow started");

        let contact = self.hubspot.get_contact(contact_id).await?;
        let link = self.hubspot.record_url("contact", contact_id);
        let text = new_contact_summary(&contact, self.high_priority_score, link.as_deref());

        self.slack.post_message(&self.team_channel, &text).await?;
        Ok(())
    }
}

fn new_contact_summary(
    contact: &CrmRecord,
    high_priority_score: i64,
    link: Option<&str>,
) -> String {
    let name = contact_display_name(contact);
    let mut lines = vec![format!(":new: New contact: *{name}*")];

    if let Some(company) = contact.property("company") {
        lines.push(format!("Company: {company}"));
    }
    if let Some(title) = contact.property("jobtitle") {
        lines.push(format!("Title: {title}"));
    }
    if let Some(email) = contact.property("email") {
        lines.push(format!("Email: {email}"));
    }
    if let Some(score) = contact.numeric_property("hubspotscore") {
        if score >= high_priority_score {
            lines.push(format!(":fire: High priority lead (score {score})"));
        } else {
            lines.push(format!("Lead score: {score}"));
        }
    }
    if let Some(link) = link {
        lines.push(format!("<{link}|Open in HubSpot>"));
    }

    lines.join("\n")
}
