//! Probe servers: `/probes`.

use crate::client::{Client, Params};
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    pub id: i64,
    pub country: String,
    pub city: String,
    pub name: String,
    pub active: bool,
    pub hostname: String,
    pub ip: String,
    pub ipv6: String,
    #[serde(rename = "countryiso")]
    pub country_iso: String,
    pub region: String,
}

#[derive(Deserialize)]
struct ListProbes {
    #[serde(default)]
    probes: Vec<Probe>,
}

/// Read-only access to the probe server list.
pub struct Probes<'a> {
    client: &'a Client,
}

impl<'a> Probes<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List probes, optionally filtered (`onlyactive`, `includedeleted`, ...).
    pub async fn list(&self, params: Option<&Params>) -> Result<Vec<Probe>> {
        let req = self.client.new_request(Method::GET, "/probes", params)?;
        let res: ListProbes = self.client.fetch(req).await?;
        Ok(res.probes)
    }
}
