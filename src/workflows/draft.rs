//! Outreach drafting workflow.
//!
//! Triggered when a contact property change signals they are ready for
//! outreach. Asks Claude for a short personalized email and posts the
//! draft to the team channel for human review — nothing is sent to the
//! contact automatically.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::WorkflowError;
use crate::integrations::{AssistantClient, CrmRecord, HubSpotClient, SlackClient};
use crate::workflows::{WorkflowHandler, contact_display_name};

const DRAFT_SYSTEM_PROMPT: &str = "You are an assistant for a business development team. \
Write short, personable first-touch outreach emails. Plain text only, no subject line, \
no placeholders, under 120 words.";

pub struct DraftWorkflow {
    hubspot: Arc<HubSpotClient>,
    assistant: Arc<AssistantClient>,
    slack: Arc<SlackClient>,
    team_channel: String,
}

impl DraftWorkflow {
    pub fn new(
        hubspot: Arc<HubSpotClient>,
        assistant: Arc<AssistantClient>,
        slack: Arc<SlackClient>,
        team_channel: impl Into<String>,
    ) -> Self {
        Self {
            hubspot,
            assistant,
            slack,
            team_channel: team_channel.into(),
        }
    }
}

#[async_trait]
impl WorkflowHandler for DraftWorkflow {
    fn name(&self) -> &'static str {
        "draft"
    }

    async fn run(&self, contact_id: &str) -> Result<(), WorkflowError> {
        info!(contact_id, "Draft workflow started");

        let contact = self.hubspot.get_contact(contact_id).await?;
        let draft = self
            .assistant
            .ask(&draft_prompt(&contact), Some(DRAFT_SYSTEM_PROMPT))
            .await?;

        let name = contact_display_name(&contact);
        let text = format!(":pencil2: Outreach draft for *{name}* — review before sending:\n```{draft}```");
        self.slack.post_message(&self.team_channel, &text).await?;
        Ok(())
    }
}

fn draft_prompt(contact: &CrmRecord) -> String {
    let mut lines = vec![
        "Draft an outreach email to this contact:".to_string(),
        format!("Name: {}", contact_display_name(contact)),
    ];
    if let Some(company) = contact.property("company") {
        lines.push(format!("Company: {company}"));
    }
    if let Some(title) = contact.property("jobtitle") {
        lines.push(format!("Job title: {title}"));
    }
    if let Some(stage) = contact.property("lifecyclestage") {
        lines.push(format!("Lifecycle stage: {stage}"));
    }
    if let Some(status) = contact.property("hs_lead_status") {
        lines.push(format!("Lead status: {status}"));
    }
    lines.join("\n")
}
