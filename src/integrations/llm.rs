//! Claude access for the drafting and briefing workflows.
//!
//! Uses rig-core for transport; one short completion per call, no
//! conversation state.

use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::anthropic;
use secrecy::ExposeSecret;

use crate::config::Config;
use crate::error::IntegrationError;

/// Max tokens per completion — drafts and briefings are short.
const MAX_TOKENS: u64 = 1024;

/// One-shot Claude client.
pub struct AssistantClient {
    client: rig::client::Client<anthropic::client::AnthropicExt>,
    model: String,
}

impl AssistantClient {
    pub fn from_config(config: &Config) -> Result<Self, IntegrationError> {
        let api_key = config.anthropic_api_key.as_ref().ok_or_else(|| {
            IntegrationError::NotConfigured {
                service: "anthropic".to_string(),
            }
        })?;

        let client = anthropic::Client::new(api_key.expose_secret()).map_err(|e| {
            IntegrationError::RequestFailed {
                service: "anthropic".to_string(),
                reason: format!("Failed to create Anthropic client: {e}"),
            }
        })?;

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    /// Send a prompt and return the completion text.
    pub async fn ask(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, IntegrationError> {
        let mut builder = self.client.agent(&self.model).max_tokens(MAX_TOKENS);
        if let Some(system) = system_prompt {
            builder = builder.preamble(system);
        }
        let agent = builder.build();

        agent
            .prompt(prompt)
            .await
            .map_err(|e| IntegrationError::RequestFailed {
                service: "anthropic".to_string(),
                reason: e.to_string(),
            })
    }
}
