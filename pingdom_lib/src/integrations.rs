//! Alert integrations (webhooks and friends): `/data/v3/integration`.
//!
//! These endpoints live on the session-login host; create the client with
//! session credentials, or point a token client's base URL there.

use crate::client::Client;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider id of the generic webhook integration.
pub const WEBHOOK_PROVIDER_ID: i64 = 2;

/// Integration definition sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Integration {
    pub active: bool,
    pub provider_id: i64,
    /// Provider-specific settings; every provider needs `name`.
    pub user_data: BTreeMap<String, String>,
}

impl Integration {
    /// An active webhook posting to `url`.
    pub fn webhook(name: impl Into<String>, url: impl Into<String>) -> Self {
        let mut user_data = BTreeMap::new();
        user_data.insert("name".to_string(), name.into());
        user_data.insert("url".to_string(), url.into());
        Self {
            active: true,
            provider_id: WEBHOOK_PROVIDER_ID,
            user_data,
        }
    }

    pub fn valid(&self) -> Result<()> {
        if self.user_data.get("name").map_or(true, |n| n.is_empty()) {
            return Err(Error::Validation(
                "integration user data needs a non-empty `name`".to_string(),
            ));
        }
        if self.provider_id <= 0 {
            return Err(Error::Validation("`provider_id` must be set".to_string()));
        }
        if self.provider_id == WEBHOOK_PROVIDER_ID
            && self.user_data.get("url").map_or(true, |u| u.is_empty())
        {
            return Err(Error::Validation("a webhook needs a `url`".to_string()));
        }
        Ok(())
    }
}

/// An integration as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationResponse {
    #[serde(rename = "number", alias = "id")]
    pub id: i64,
    pub active: bool,
    pub provider_id: i64,
    pub provider_name: String,
    pub activated_at: i64,
    pub user_data: BTreeMap<String, String>,
}

/// Outcome of a create, update or delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationStatus {
    pub status: bool,
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationProvider {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Deserialize)]
struct ListIntegrations {
    #[serde(default)]
    integration: Vec<IntegrationResponse>,
}

#[derive(Deserialize)]
struct IntegrationDetails {
    integration: IntegrationResponse,
}

#[derive(Deserialize)]
struct StatusEnvelope {
    integration: IntegrationStatus,
}

/// Operations on alert integrations.
pub struct Integrations<'a> {
    client: &'a Client,
}

impl<'a> Integrations<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<IntegrationResponse>> {
        let req = self
            .client
            .new_request(Method::GET, "/data/v3/integration", None)?;
        let res: ListIntegrations = self.client.fetch(req).await?;
        Ok(res.integration)
    }

    pub async fn read(&self, id: i64) -> Result<IntegrationResponse> {
        let path = format!("/data/v3/integration/{}", id);
        let req = self.client.new_request(Method::GET, &path, None)?;
        let res: IntegrationDetails = self.client.fetch(req).await?;
        Ok(res.integration)
    }

    pub async fn create(&self, integration: &Integration) -> Result<IntegrationStatus> {
        integration.valid()?;
        let body = serde_json::to_string(integration)?;
        let req = self
            .client
            .new_json_request(Method::POST, "/data/v3/integration", body)?;
        let res: StatusEnvelope = self.client.fetch(req).await?;
        Ok(res.integration)
    }

    pub async fn update(&self, id: i64, integration: &Integration) -> Result<IntegrationStatus> {
        integration.valid()?;
        let body = serde_json::to_string(integration)?;
        let path = format!("/data/v3/integration/{}", id);
        let req = self.client.new_json_request(Method::PUT, &path, body)?;
        let res: StatusEnvelope = self.client.fetch(req).await?;
        Ok(res.integration)
    }

    pub async fn delete(&self, id: i64) -> Result<IntegrationStatus> {
        let path = format!("/data/v3/integration/{}", id);
        let req = self.client.new_request(Method::DELETE, &path, None)?;
        let res: StatusEnvelope = self.client.fetch(req).await?;
        Ok(res.integration)
    }

    pub async fn list_providers(&self) -> Result<Vec<IntegrationProvider>> {
        let req = self
            .client
            .new_request(Method::GET, "/data/v3/integration/providers", None)?;
        self.client.fetch(req).await
    }
}
