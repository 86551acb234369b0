//! Follow-up workflow for contact engagement.
//!
//! Triggered by engagement signals (opened/clicked email, updated notes).
//! Nudges the team channel so the owning BDR follows up while the
//! contact is warm.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::WorkflowError;
use crate::integrations::{HubSpotClient, SlackClient};
use crate::workflows::{WorkflowHandler, contact_display_name};

pub struct FollowupWorkflow {
    hubspot: Arc<HubSpotClient>,
    slack: Arc<SlackClient>,
    team_channel: String,
}

impl FollowupWorkflow {
    pub fn new(
        hubspot: Arc<HubSpotClient>,
        slack: Arc<SlackClient>,
        team_channel: impl Into<String>,
    ) -> Self {
        Self {
            hubspot,
            slack,
            team_channel: team_channel.into(),
        }
    }
}

#[async_trait]
impl WorkflowHandler for FollowupWorkflow {
    fn name(&self) -> &'static str {
        "followup"
    }

    async fn run(&self, contact_id: &str) -> Result<(), WorkflowError> {
        info!(contact_id, "Followup workflow started");

        let contact = self.hubspot.get_contact(contact_id).await?;
        let name = contact_display_name(&contact);

        let mut text = format!(":wave: *{name}* just engaged — good time to follow up.");
        if let Some(link) = self.hubspot.record_url("contact", contact_id) {
            text.push_str(&format!("\n<{link}|Open in HubSpot>"));
        }

        self.slack.post_message(&self.team_channel, &text).await?;
        Ok(())
    }
}
