//! Uptime checks: `/checks` and `/summary.performance`.

use crate::check_types::{Check, SummaryPerformanceRequest};
use crate::client::{Client, Params};
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Generic acknowledgement returned by updates and deletes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// A check as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResponse {
    pub id: i64,
    pub name: String,
    pub hostname: String,
    pub resolution: u32,
    pub status: String,
    pub paused: bool,
    pub created: i64,
    #[serde(rename = "lasterrortime")]
    pub last_error_time: i64,
    #[serde(rename = "lasttesttime")]
    pub last_test_time: i64,
    #[serde(rename = "lastresponsetime")]
    pub last_response_time: i64,
    #[serde(rename = "sendnotificationwhendown")]
    pub send_notification_when_down: u32,
    #[serde(rename = "notifyagainevery")]
    pub notify_again_every: u32,
    #[serde(rename = "notifywhenbackup")]
    pub notify_when_backup: bool,
    #[serde(rename = "responsetime_threshold")]
    pub response_time_threshold: u32,
    pub custom_message: String,
    pub ipv6: bool,
    #[serde(rename = "integrationids")]
    pub integration_ids: Vec<i64>,
    #[serde(rename = "userids")]
    pub user_ids: Vec<i64>,
    #[serde(rename = "teamids")]
    pub team_ids: Vec<i64>,
    pub teams: Vec<CheckTeam>,
    pub tags: Vec<CheckTag>,
    pub probe_filters: Vec<String>,
    #[serde(rename = "type")]
    pub check_type: CheckResponseType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckTeam {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckTag {
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: String,
    pub count: Value,
}

/// The `type` of a check.
///
/// Listings send a bare name (`"http"`); single-check reads send an object
/// keyed by the name whose value holds the type-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckResponseType {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp: Option<TcpDetails>,
    /// Settings of any other type, undecoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<Value>,
}

impl<'de> Deserialize<'de> for CheckResponseType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Detailed(BTreeMap<String, Value>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => Ok(Self {
                name,
                ..Self::default()
            }),
            Raw::Detailed(map) => {
                let mut out = Self::default();
                if let Some((name, details)) = map.into_iter().next() {
                    match name.as_str() {
                        "http" => {
                            out.http = Some(
                                serde_json::from_value(details).map_err(serde::de::Error::custom)?,
                            )
                        }
                        "tcp" => {
                            out.tcp = Some(
                                serde_json::from_value(details).map_err(serde::de::Error::custom)?,
                            )
                        }
                        _ => out.other = Some(details),
                    }
                    out.name = name;
                }
                Ok(out)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpDetails {
    pub url: String,
    pub encryption: bool,
    pub port: u32,
    pub username: String,
    pub password: String,
    #[serde(rename = "shouldcontain")]
    pub should_contain: String,
    #[serde(rename = "shouldnotcontain")]
    pub should_not_contain: String,
    #[serde(rename = "postdata")]
    pub post_data: String,
    #[serde(rename = "requestheaders")]
    pub request_headers: BTreeMap<String, String>,
    pub verify_certificate: Option<bool>,
    pub ssl_down_days_before: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpDetails {
    pub port: u32,
    #[serde(rename = "stringtosend")]
    pub string_to_send: String,
    #[serde(rename = "stringtoexpect")]
    pub string_to_expect: String,
}

/// Response of `/summary.performance/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPerformanceResponse {
    pub summary: SummaryPerformance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPerformance {
    pub hours: Vec<SummaryPerformanceEntry>,
    pub days: Vec<SummaryPerformanceEntry>,
    pub weeks: Vec<SummaryPerformanceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPerformanceEntry {
    #[serde(rename = "starttime")]
    pub start_time: i64,
    #[serde(rename = "avgresponse")]
    pub avg_response: i64,
    pub uptime: i64,
    pub downtime: i64,
    pub unmonitored: i64,
}

#[derive(Deserialize)]
struct ListChecks {
    #[serde(default)]
    checks: Vec<CheckResponse>,
}

#[derive(Deserialize)]
struct CheckDetails {
    check: CheckResponse,
}

/// Operations on uptime checks.
pub struct Checks<'a> {
    client: &'a Client,
}

impl<'a> Checks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List checks, optionally filtered (e.g. `tags`, `limit`, `offset`).
    pub async fn list(&self, params: Option<&Params>) -> Result<Vec<CheckResponse>> {
        let req = self.client.new_request(Method::GET, "/checks", params)?;
        let res: ListChecks = self.client.fetch(req).await?;
        Ok(res.checks)
    }

    /// Read one check, including its teams.
    pub async fn read(&self, id: i64) -> Result<CheckResponse> {
        let path = format!("/checks/{}?include_teams=true", id);
        let req = self.client.new_request(Method::GET, &path, None)?;
        let res: CheckDetails = self.client.fetch(req).await?;
        Ok(res.check)
    }

    /// Create a check. The response carries the new id and name.
    pub async fn create<C: Check + ?Sized>(&self, check: &C) -> Result<CheckResponse> {
        check.valid()?;
        let params = check.post_params();
        let req = self.client.new_request(Method::POST, "/checks", Some(&params))?;
        let res: CheckDetails = self.client.fetch(req).await?;
        Ok(res.check)
    }

    pub async fn update<C: Check + ?Sized>(&self, id: i64, check: &C) -> Result<MessageResponse> {
        check.valid()?;
        let params = check.put_params();
        let path = format!("/checks/{}", id);
        let req = self.client.new_request(Method::PUT, &path, Some(&params))?;
        self.client.fetch(req).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        let path = format!("/checks/{}", id);
        let req = self.client.new_request(Method::DELETE, &path, None)?;
        self.client.fetch(req).await
    }

    pub async fn summary_performance(
        &self,
        request: &SummaryPerformanceRequest,
    ) -> Result<SummaryPerformanceResponse> {
        request.valid()?;
        let params = request.get_params();
        let path = format!("/summary.performance/{}", request.id);
        let req = self.client.new_request(Method::GET, &path, Some(&params))?;
        self.client.fetch(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn check_type_from_name() {
        let c: CheckResponse = serde_json::from_value(json!({
            "id": 85975, "name": "My check 1", "type": "http", "status": "up"
        }))
        .unwrap();
        assert_eq!(c.check_type.name, "http");
        assert!(c.check_type.http.is_none());
    }

    #[test]
    fn check_type_from_details() {
        let c: CheckResponse = serde_json::from_value(json!({
            "id": 85975,
            "name": "My check 1",
            "type": {
                "http": {
                    "url": "/",
                    "encryption": false,
                    "port": 80,
                    "requestheaders": {
                        "User-Agent": "Pingdom.com_bot_version_1.4_(http://www.pingdom.com/)"
                    }
                }
            },
            "teams": [{"id": 7, "name": "ops"}],
            "tags": [{"name": "apache", "type": "a", "count": 2}]
        }))
        .unwrap();
        assert_eq!(c.check_type.name, "http");
        let http = c.check_type.http.unwrap();
        assert_eq!(http.url, "/");
        assert_eq!(http.port, 80);
        assert_eq!(c.teams[0].name, "ops");
        assert_eq!(c.tags[0].name, "apache");
    }

    #[test]
    fn check_type_other_kept_raw() {
        let t: CheckResponseType =
            serde_json::from_value(json!({"dns": {"nameserver": "8.8.8.8"}})).unwrap();
        assert_eq!(t.name, "dns");
        assert_eq!(t.other, Some(json!({"nameserver": "8.8.8.8"})));
    }
}
