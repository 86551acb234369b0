//! Slack integration — team notifications and error reports.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::error::IntegrationError;
use crate::router::reporter::ErrorSink;

const SLACK_BASE_URL: &str = "https://slack.com/api";

/// Slack payloads attached to error reports are clipped to this many
/// characters so a huge webhook body cannot break chat.postMessage.
const MAX_CONTEXT_CHARS: usize = 3000;

/// Slack Web API client.
pub struct SlackClient {
    bot_token: SecretString,
    error_channel: String,
    client: reqwest::Client,
}

impl SlackClient {
    pub fn from_config(config: &Config) -> Result<Self, IntegrationError> {
        let bot_token =
            config
                .slack_bot_token
                .clone()
                .ok_or_else(|| IntegrationError::NotConfigured {
                    service: "slack".to_string(),
                })?;
        Ok(Self {
            bot_token,
            error_channel: config.slack_error_channel.clone(),
            client: reqwest::Client::new(),
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{SLACK_BASE_URL}/{method}")
    }

    /// Post a message to a channel.
    ///
    /// Slack reports API-level failures inside a 200 response, so the
    /// `ok` field is checked in addition to the HTTP status.
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), IntegrationError> {
        let body = serde_json::json!({
            "channel": channel,
            "text": text,
        });

        let response = self
            .client
            .post(self.api_url("chat.postMessage"))
            .bearer_auth(self.bot_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| IntegrationError::RequestFailed {
                service: "slack".to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::ApiError {
                service: "slack".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let reply: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| IntegrationError::InvalidResponse {
                    service: "slack".to_string(),
                    reason: e.to_string(),
                })?;

        if !reply["ok"].as_bool().unwrap_or(false) {
            return Err(IntegrationError::ApiError {
                service: "slack".to_string(),
                status: status.as_u16(),
                body: reply["error"].as_str().unwrap_or("unknown error").to_string(),
            });
        }

        Ok(())
    }

    /// Post an error notification to the designated error channel.
    pub async fn post_error(
        &self,
        message: &str,
        context: &serde_json::Value,
    ) -> Result<(), IntegrationError> {
        let text = format!(
            ":rotating_light: {message}\n```{}```",
            format_context(context)
        );
        self.post_message(&self.error_channel, &text).await
    }
}

#[async_trait]
impl ErrorSink for SlackClient {
    async fn notify(
        &self,
        message: &str,
        context: serde_json::Value,
    ) -> Result<(), IntegrationError> {
        self.post_error(message, &context).await
    }
}

fn format_context(context: &serde_json::Value) -> String {
    let mut rendered =
        serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string());
    if rendered.len() > MAX_CONTEXT_CHARS {
        let mut end = MAX_CONTEXT_CHARS;
        while !rendered.is_char_boundary(end) {
            end -= 1;
        }
        rendered.truncate(end);
        rendered.push_str("\n… (truncated)");
    }
    rendered
}
