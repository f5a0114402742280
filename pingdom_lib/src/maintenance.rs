//! Maintenance windows: `/maintenance`.

use crate::checks::MessageResponse;
use crate::client::{Client, Params};
use crate::error::{Error, Result};
use crate::helpers::join_ids;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Maintenance window definition sent on create and update.
///
/// `from`, `to` and `effective_to` are Unix timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceWindow {
    pub description: String,
    pub from: i64,
    pub to: i64,
    /// `none`, `day`, `week` or `month`.
    pub recurrence_type: String,
    pub repeat_every: u32,
    pub effective_to: i64,
    pub uptime_ids: Vec<i64>,
    pub tms_ids: Vec<i64>,
}

impl MaintenanceWindow {
    /// A one-off window between two instants.
    pub fn between(description: impl Into<String>, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            from: from.timestamp(),
            to: to.timestamp(),
            ..Self::default()
        }
    }

    pub fn put_params(&self) -> Params {
        let mut m = Params::new();
        m.insert("description".to_string(), self.description.clone());
        m.insert("from".to_string(), self.from.to_string());
        m.insert("to".to_string(), self.to.to_string());
        if !self.recurrence_type.is_empty() {
            m.insert("recurrencetype".to_string(), self.recurrence_type.clone());
        }
        if self.repeat_every != 0 {
            m.insert("repeatevery".to_string(), self.repeat_every.to_string());
        }
        if self.effective_to != 0 {
            m.insert("effectiveto".to_string(), self.effective_to.to_string());
        }
        if !self.uptime_ids.is_empty() {
            m.insert("uptimeids".to_string(), join_ids(&self.uptime_ids));
        }
        if !self.tms_ids.is_empty() {
            m.insert("tmsids".to_string(), join_ids(&self.tms_ids));
        }
        m
    }

    pub fn post_params(&self) -> Params {
        let mut m = self.put_params();
        m.retain(|_, v| !v.is_empty());
        m
    }

    pub fn valid(&self) -> Result<()> {
        if self.description.is_empty() {
            return Err(Error::Validation(
                "invalid value for `description`, must contain non-empty string".to_string(),
            ));
        }
        if self.from == 0 || self.to == 0 {
            return Err(Error::Validation(
                "`from` and `to` must both be set".to_string(),
            ));
        }
        if self.from >= self.to {
            return Err(Error::Validation("`from` must be before `to`".to_string()));
        }
        Ok(())
    }
}

/// A maintenance window as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceResponse {
    pub id: i64,
    pub description: String,
    pub from: i64,
    pub to: i64,
    #[serde(rename = "recurrencetype")]
    pub recurrence_type: String,
    #[serde(rename = "repeatevery")]
    pub repeat_every: u32,
    #[serde(rename = "effectiveto")]
    pub effective_to: i64,
    pub checks: MaintenanceChecks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceChecks {
    pub uptime: Vec<i64>,
    pub tms: Vec<i64>,
}

#[derive(Deserialize)]
struct ListMaintenance {
    #[serde(default)]
    maintenance: Vec<MaintenanceResponse>,
}

#[derive(Deserialize)]
struct MaintenanceDetails {
    maintenance: MaintenanceResponse,
}

/// Operations on maintenance windows.
pub struct Maintenance<'a> {
    client: &'a Client,
}

impl<'a> Maintenance<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List windows, optionally paged (`limit`, `offset`, `orderby`, `order`).
    pub async fn list(&self, params: Option<&Params>) -> Result<Vec<MaintenanceResponse>> {
        let req = self.client.new_request(Method::GET, "/maintenance", params)?;
        let res: ListMaintenance = self.client.fetch(req).await?;
        Ok(res.maintenance)
    }

    pub async fn read(&self, id: i64) -> Result<MaintenanceResponse> {
        let path = format!("/maintenance/{}", id);
        let req = self.client.new_request(Method::GET, &path, None)?;
        let res: MaintenanceDetails = self.client.fetch(req).await?;
        Ok(res.maintenance)
    }

    pub async fn create(&self, window: &MaintenanceWindow) -> Result<MaintenanceResponse> {
        window.valid()?;
        let params = window.post_params();
        let req = self
            .client
            .new_request(Method::POST, "/maintenance", Some(&params))?;
        let res: MaintenanceDetails = self.client.fetch(req).await?;
        Ok(res.maintenance)
    }

    pub async fn update(&self, id: i64, window: &MaintenanceWindow) -> Result<MessageResponse> {
        window.valid()?;
        let params = window.put_params();
        let path = format!("/maintenance/{}", id);
        let req = self.client.new_request(Method::PUT, &path, Some(&params))?;
        self.client.fetch(req).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        let path = format!("/maintenance/{}", id);
        let req = self.client.new_request(Method::DELETE, &path, None)?;
        self.client.fetch(req).await
    }

    /// Delete several windows in one call.
    pub async fn multi_delete(&self, ids: &[i64]) -> Result<MessageResponse> {
        if ids.is_empty() {
            return Err(Error::Validation("no maintenance ids given".to_string()));
        }
        let mut params = Params::new();
        params.insert("maintenanceids".to_string(), join_ids(ids));
        let req = self
            .client
            .new_request(Method::DELETE, "/maintenance", Some(&params))?;
        self.client.fetch(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_between_instants() {
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 1, 1, 2, 0, 0).unwrap();
        let w = MaintenanceWindow::between("upgrade", from, to);
        assert_eq!(w.to - w.from, 7200);
        assert!(w.valid().is_ok());
    }

    #[test]
    fn window_validation() {
        let mut w = MaintenanceWindow {
            description: "upgrade".into(),
            from: 100,
            ..MaintenanceWindow::default()
        };
        assert!(w.valid().is_err());
        w.to = 50;
        assert!(w.valid().is_err());
        w.to = 200;
        assert!(w.valid().is_ok());
        w.description.clear();
        assert!(w.valid().is_err());
    }

    #[test]
    fn window_params() {
        let w = MaintenanceWindow {
            description: "upgrade".into(),
            from: 100,
            to: 200,
            recurrence_type: "week".into(),
            repeat_every: 2,
            uptime_ids: vec![1, 2],
            ..MaintenanceWindow::default()
        };
        let p = w.post_params();
        assert_eq!(p["from"], "100");
        assert_eq!(p["recurrencetype"], "week");
        assert_eq!(p["repeatevery"], "2");
        assert_eq!(p["uptimeids"], "1,2");
        assert!(!p.contains_key("tmsids"));
        assert!(!p.contains_key("effectiveto"));
    }
}
