//! HubSpot CRM integration — contact and deal records.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::Config;
use crate::error::IntegrationError;

const HUBSPOT_BASE_URL: &str = "https://api.hubapi.com";

/// Contact properties fetched for workflow context.
const CONTACT_PROPERTIES: &[&str] = &[
    "firstname",
    "lastname",
    "email",
    "company",
    "jobtitle",
    "lifecyclestage",
    "hs_lead_status",
    "hubspotscore",
];

/// Deal properties fetched for workflow context.
const DEAL_PROPERTIES: &[&str] = &["dealname", "dealstage", "pipeline", "amount", "closedate"];

/// A CRM record as returned by the v3 objects API: an id plus a map of
/// property values. HubSpot serializes every property value as a string
/// and uses null for unset ones.
#[derive(Debug, Clone, Deserialize)]
pub struct CrmRecord {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
}

impl CrmRecord {
    /// A property value, with unset/null collapsed to `None`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(|v| v.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// A numeric property (HubSpot sends numbers as strings).
    pub fn numeric_property(&self, name: &str) -> Option<i64> {
        self.property(name).and_then(|s| s.parse().ok())
    }
}

/// HubSpot API client.
pub struct HubSpotClient {
    api_key: SecretString,
    portal_id: Option<String>,
    client: reqwest::Client,
}

impl HubSpotClient {
    pub fn from_config(config: &Config) -> Result<Self, IntegrationError> {
        let api_key =
            config
                .hubspot_api_key
                .clone()
                .ok_or_else(|| IntegrationError::NotConfigured {
                    service: "hubspot".to_string(),
                })?;
        Ok(Self {
            api_key,
            portal_id: config.hubspot_portal_id.clone(),
            client: reqwest::Client::new(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{HUBSPOT_BASE_URL}{path}")
    }

    /// Fetch a contact by id.
    pub async fn get_contact(&self, contact_id: &str) -> Result<CrmRecord, IntegrationError> {
        self.get_object("contacts", contact_id, CONTACT_PROPERTIES)
            .await
    }

    /// Fetch a deal by id.
    pub async fn get_deal(&self, deal_id: &str) -> Result<CrmRecord, IntegrationError> {
        self.get_object("deals", deal_id, DEAL_PROPERTIES).await
    }

    async fn get_object(
        &self,
        object_type: &str,
        id: &str,
        properties: &[&str],
    ) -> Result<CrmRecord, IntegrationError> {
        let response = self
            .client
            .get(self.api_url(&format!("/crm/v3/objects/{object_type}/{id}")))
            .bearer_auth(self.api_key.expose_secret())
            .query(&[("properties", properties.join(","))])
            .send()
            .await
            .map_err(|e| IntegrationError::RequestFailed {
                service: "hubspot".to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::ApiError {
                service: "hubspot".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| IntegrationError::InvalidResponse {
                service: "hubspot".to_string(),
                reason: e.to_string(),
            })
    }

    /// Update a contact's properties.
    pub async fn update_contact(
        &self,
        contact_id: &str,
        properties: serde_json::Value,
    ) -> Result<(), IntegrationError> {
        let response = self
            .client
            .patch(self.api_url(&format!("/crm/v3/objects/contacts/{contact_id}")))
            .bearer_auth(self.api_key.expose_secret())
            .json(&serde_json::json!({ "properties": properties }))
            .send()
            .await
            .map_err(|e| IntegrationError::RequestFailed {
                service: "hubspot".to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::ApiError {
                service: "hubspot".to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Deep link into the HubSpot UI, if a portal id is configured.
    pub fn record_url(&self, object_type: &str, id: &str) -> Option<String> {
        self.portal_id
            .as_ref()
            .map(|portal| format!("https://app.hubspot.com/contacts/{portal}/{object_type}/{id}"))
    }
}
