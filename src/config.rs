//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Service configuration, loaded once at startup and passed into
/// constructors. Nothing reads the environment after `from_env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// HubSpot private app token (CRM reads/writes).
    pub hubspot_api_key: Option<SecretString>,
    /// Anthropic API key for the drafting/briefing assistant.
    pub anthropic_api_key: Option<SecretString>,
    /// Slack bot token for team notifications and error reports.
    pub slack_bot_token: Option<SecretString>,
    /// HubSpot portal id, used to build record links in notifications.
    pub hubspot_portal_id: Option<String>,
    /// Slack channel for workflow output (drafts, briefings).
    pub slack_team_channel: String,
    /// Slack channel for error notifications.
    pub slack_error_channel: String,
    /// Claude model used by the Draft and Prep workflows.
    pub model: String,
    /// HTTP listen port for the webhook server.
    pub port: u16,
    /// Lead score at or above which a contact is flagged high priority.
    pub high_priority_score: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hubspot_api_key: None,
            anthropic_api_key: None,
            slack_bot_token: None,
            hubspot_portal_id: None,
            slack_team_channel: "#bdr-workflows".to_string(),
            slack_error_channel: "#bdr-errors".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            port: 8080,
            high_priority_score: 7,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// API keys are optional at load time so the server can start in a
    /// partially configured environment; each integration reports
    /// `NotConfigured` when first used without its credential.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("BDR_ASSIST_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BDR_ASSIST_PORT".to_string(),
                message: format!("not a valid port number: {raw}"),
            })?,
            Err(_) => defaults.port,
        };

        let high_priority_score = match std::env::var("BDR_ASSIST_HIGH_PRIORITY_SCORE") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BDR_ASSIST_HIGH_PRIORITY_SCORE".to_string(),
                message: format!("not an integer: {raw}"),
            })?,
            Err(_) => defaults.high_priority_score,
        };

        Ok(Self {
            hubspot_api_key: secret_var("HUBSPOT_API_KEY"),
            anthropic_api_key: secret_var("ANTHROPIC_API_KEY"),
            slack_bot_token: secret_var("SLACK_BOT_TOKEN"),
            hubspot_portal_id: std::env::var("HUBSPOT_PORTAL_ID").ok(),
            slack_team_channel: std::env::var("SLACK_TEAM_CHANNEL")
                .unwrap_or(defaults.slack_team_channel),
            slack_error_channel: std::env::var("SLACK_ERROR_CHANNEL")
                .unwrap_or(defaults.slack_error_channel),
            model: std::env::var("BDR_ASSIST_MODEL").unwrap_or(defaults.model),
            port,
            high_priority_score,
        })
    }
}

fn secret_var(key: &str) -> Option<SecretString> {
    std::env::var(key).ok().map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.high_priority_score, 7);
        assert!(config.hubspot_api_key.is_none());
        assert!(config.slack_error_channel.starts_with('#'));
    }
}
