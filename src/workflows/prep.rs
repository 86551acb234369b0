//! Deal preparation workflow.
//!
//! Triggered when a deal moves to a new stage: pulls the deal record,
//! asks Claude for a short briefing, and posts it to the team channel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::WorkflowError;
use crate::integrations::{AssistantClient, CrmRecord, HubSpotClient, SlackClient};
use crate::workflows::WorkflowHandler;

const PREP_SYSTEM_PROMPT: &str = "You are an assistant for a business development team. \
Produce a brief deal-stage briefing: what the stage change means, three talking points, \
and one suggested next step. Keep it under 150 words.";

pub struct PrepWorkflow {
    hubspot: Arc<HubSpotClient>,
    assistant: Arc<AssistantClient>,
    slack: Arc<SlackClient>,
    team_channel: String,
}

impl PrepWorkflow {
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
impl WorkflowHandler for PrepWorkflow {
    fn name(&self) -> &'static str {
        "prep"
    }

    async fn run(&self, deal_id: &str) -> Result<(), WorkflowError> {
        info!(deal_id, "Prep workflow started");

        let deal = self.hubspot.get_deal(deal_id).await?;
        let briefing = self
            .assistant
            .ask(&prep_prompt(&deal), Some(PREP_SYSTEM_PROMPT))
            .await?;

        let deal_name = deal.property("dealname").unwrap_or(deal_id);
        let mut text =
            format!(":briefcase: Deal *{deal_name}* moved stage — briefing:\n{briefing}");
        if let Some(link) = self.hubspot.record_url("deal", deal_id) {
            text.push_str(&format!("\n<{link}|Open in HubSpot>"));
        }

        self.slack.post_message(&self.team_channel, &text).await?;
        Ok(())
    }
}

fn prep_prompt(deal: &CrmRecord) -> String {
    let mut lines = vec!["Prepare a briefing for this deal:".to_string()];
    for (label, property) in [
        ("Deal", "dealname"),
        ("Stage", "dealstage"),
        ("Pipeline", "pipeline"),
        ("Amount", "amount"),
        ("Close date", "closedate"),
    ] {
        if let Some(value) = deal.property(property) {
            lines.push(format!("{label}: {value}"));
        }
    }
    lines.join("\n")
}
