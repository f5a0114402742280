//! Occurrences of maintenance windows: `/maintenance.occurrences`.

use crate::checks::MessageResponse;
use crate::client::{Client, MultiParams, Params};
use crate::error::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// One occurrence of a (possibly recurring) maintenance window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Occurrence {
    pub id: i64,
    #[serde(rename = "maintenanceid")]
    pub maintenance_id: i64,
    pub from: i64,
    pub to: i64,
    pub duration: i64,
    #[serde(rename = "durationunit")]
    pub duration_unit: String,
}

impl Occurrence {
    pub fn put_params(&self) -> Params {
        let mut m = Params::new();
        m.insert("from".to_string(), self.from.to_string());
        m.insert("to".to_string(), self.to.to_string());
        m
    }

    pub fn valid(&self) -> Result<()> {
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

/// Filters for listing occurrences. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOccurrenceQuery {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub maintenance_id: Option<i64>,
}

impl ListOccurrenceQuery {
    pub fn params(&self) -> Params {
        let mut m = Params::new();
        if let Some(from) = self.from {
            m.insert("from".to_string(), from.to_string());
        }
        if let Some(to) = self.to {
            m.insert("to".to_string(), to.to_string());
        }
        if let Some(id) = self.maintenance_id {
            m.insert("maintenanceid".to_string(), id.to_string());
        }
        m
    }
}

#[derive(Deserialize)]
struct ListOccurrences {
    #[serde(default)]
    occurrences: Vec<Occurrence>,
}

#[derive(Deserialize)]
struct OccurrenceDetails {
    occurrence: Occurrence,
}

/// Operations on maintenance occurrences.
pub struct Occurrences<'a> {
    client: &'a Client,
}

impl<'a> Occurrences<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListOccurrenceQuery) -> Result<Vec<Occurrence>> {
        let params = query.params();
        let req = self
            .client
            .new_request(Method::GET, "/maintenance.occurrences", Some(&params))?;
        let res: ListOccurrences = self.client.fetch(req).await?;
        Ok(res.occurrences)
    }

    pub async fn read(&self, id: i64) -> Result<Occurrence> {
        let path = format!("/maintenance.occurrences/{}", id);
        let req = self.client.new_request(Method::GET, &path, None)?;
        let res: OccurrenceDetails = self.client.fetch(req).await?;
        Ok(res.occurrence)
    }

    /// Move an occurrence to the `from`/`to` of `occurrence`.
    pub async fn update(&self, id: i64, occurrence: &Occurrence) -> Result<MessageResponse> {
        occurrence.valid()?;
        let params = occurrence.put_params();
        let path = format!("/maintenance.occurrences/{}", id);
        let req = self.client.new_request(Method::PUT, &path, Some(&params))?;
        self.client.fetch(req).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        let path = format!("/maintenance.occurrences/{}", id);
        let req = self.client.new_request(Method::DELETE, &path, None)?;
        self.client.fetch(req).await
    }

    /// Delete several occurrences; ids go out as a repeated `occurrenceids` key.
    pub async fn multi_delete(&self, ids: &[i64]) -> Result<MessageResponse> {
        if ids.is_empty() {
            return Err(Error::Validation("no occurrence ids given".to_string()));
        }
        let mut params = MultiParams::new();
        params.insert(
            "occurrenceids".to_string(),
            ids.iter().map(|id| id.to_string()).collect(),
        );
        let req = self
            .client
            .new_request_multi(Method::DELETE, "/maintenance.occurrences", Some(&params))?;
        self.client.fetch(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_skip_unset() {
        let q = ListOccurrenceQuery {
            maintenance_id: Some(9),
            ..ListOccurrenceQuery::default()
        };
        let p = q.params();
        assert_eq!(p.len(), 1);
        assert_eq!(p["maintenanceid"], "9");
    }

    #[test]
    fn occurrence_validation() {
        let mut o = Occurrence::default();
        assert!(o.valid().is_err());
        o.from = 10;
        o.to = 20;
        assert!(o.valid().is_ok());
        assert_eq!(o.put_params()["to"], "20");
    }
}
