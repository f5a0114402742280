//! Alerting teams: `/alerting/teams`.

use crate::checks::MessageResponse;
use crate::client::Client;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Team definition sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Team {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub member_ids: Vec<i64>,
}

impl Team {
    pub fn valid(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation(
                "invalid value for `name`, must contain non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

/// A team as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: String,
}

#[derive(Deserialize)]
struct ListTeams {
    #[serde(default)]
    teams: Vec<TeamResponse>,
}

#[derive(Deserialize)]
struct TeamDetails {
    team: TeamResponse,
}

/// Operations on alerting teams.
pub struct Teams<'a> {
    client: &'a Client,
}

impl<'a> Teams<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<TeamResponse>> {
        let req = self.client.new_request(Method::GET, "/alerting/teams", None)?;
        let res: ListTeams = self.client.fetch(req).await?;
        Ok(res.teams)
    }

    pub async fn read(&self, id: i64) -> Result<TeamResponse> {
        let path = format!("/alerting/teams/{}", id);
        let req = self.client.new_request(Method::GET, &path, None)?;
        let res: TeamDetails = self.client.fetch(req).await?;
        Ok(res.team)
    }

    pub async fn create(&self, team: &Team) -> Result<TeamResponse> {
        team.valid()?;
        let body = serde_json::to_string(team)?;
        let req = self
            .client
            .new_json_request(Method::POST, "/alerting/teams", body)?;
        let res: TeamDetails = self.client.fetch(req).await?;
        Ok(res.team)
    }

    pub async fn update(&self, id: i64, team: &Team) -> Result<TeamResponse> {
        team.valid()?;
        let body = serde_json::to_string(team)?;
        let path = format!("/alerting/teams/{}", id);
        let req = self.client.new_json_request(Method::PUT, &path, body)?;
        let res: TeamDetails = self.client.fetch(req).await?;
        Ok(res.team)
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        let path = format!("/alerting/teams/{}", id);
        let req = self.client.new_request(Method::DELETE, &path, None)?;
        self.client.fetch(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_requires_name() {
        assert!(Team::default().valid().is_err());
        let t = Team {
            name: "ops".into(),
            member_ids: vec![],
        };
        assert!(t.valid().is_ok());
        assert_eq!(serde_json::to_string(&t).unwrap(), r#"{"name":"ops"}"#);
    }
}
