//! Uptime check definitions and their form parameters.
//!
//! The checks API takes flat string parameters rather than JSON, so each
//! check type knows how to flatten itself for PUT (update) and POST (create).

use crate::client::Params;
use crate::error::{Error, Result};
use crate::helpers::join_ids;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const VALID_RESOLUTIONS: [u32; 6] = [0, 1, 5, 15, 30, 60];
const VALID_SUMMARY_RESOLUTIONS: [&str; 4] = ["", "hour", "day", "week"];

/// A check that can be created or updated through the checks API.
pub trait Check {
    /// Value of the `type` parameter on creation.
    fn check_type(&self) -> &'static str;

    /// Parameters for an update. Empty values are kept so fields can be cleared.
    fn put_params(&self) -> Params;

    /// Reject values the API would refuse.
    fn valid(&self) -> Result<()>;

    /// Parameters for creation: the update set without empty values, plus `type`.
    fn post_params(&self) -> Params {
        let mut params = self.put_params();
        params.retain(|_, v| !v.is_empty());
        params.insert("type".to_string(), self.check_type().to_string());
        params
    }
}

/// HTTP(S) check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpCheck {
    pub name: String,
    pub hostname: String,
    pub url: String,
    pub encryption: bool,
    pub port: u32,
    pub username: String,
    pub password: String,
    pub custom_message: String,
    pub ipv6: bool,
    pub paused: bool,
    pub resolution: u32,
    pub notify_again_every: u32,
    pub notify_when_backup: bool,
    pub send_notification_when_down: u32,
    pub response_time_threshold: u32,
    pub should_contain: String,
    pub should_not_contain: String,
    pub post_data: String,
    pub probe_filters: String,
    pub request_headers: BTreeMap<String, String>,
    pub tags: String,
    pub integration_ids: Vec<i64>,
    pub team_ids: Vec<i64>,
    pub user_ids: Vec<i64>,
    pub verify_certificate: Option<bool>,
    pub ssl_down_days_before: Option<u32>,
}

impl Check for HttpCheck {
    fn check_type(&self) -> &'static str {
        "http"
    }

    fn put_params(&self) -> Params {
        let mut m = Params::new();
        insert(&mut m, "custom_message", &self.custom_message);
        insert(&mut m, "encryption", self.encryption);
        insert(&mut m, "host", &self.hostname);
        insert(&mut m, "integrationids", join_ids(&self.integration_ids));
        insert(&mut m, "ipv6", self.ipv6);
        insert(&mut m, "name", &self.name);
        insert(&mut m, "notifyagainevery", self.notify_again_every);
        insert(&mut m, "notifywhenbackup", self.notify_when_backup);
        insert(&mut m, "paused", self.paused);
        insert(&mut m, "postdata", &self.post_data);
        insert(&mut m, "probe_filters", &self.probe_filters);
        insert(&mut m, "tags", &self.tags);
        insert(&mut m, "teamids", join_ids(&self.team_ids));
        insert(&mut m, "url", &self.url);
        insert(&mut m, "userids", join_ids(&self.user_ids));

        insert_non_zero(&mut m, "resolution", self.resolution);
        insert_non_zero(&mut m, "sendnotificationwhendown", self.send_notification_when_down);
        insert_non_zero(&mut m, "port", self.port);
        insert_non_zero(&mut m, "responsetime_threshold", self.response_time_threshold);

        if let Some(verify) = self.verify_certificate {
            insert(&mut m, "verify_certificate", verify);
        }
        if let Some(days) = self.ssl_down_days_before {
            insert(&mut m, "ssl_down_days_before", days);
        }

        // One of the pair is always sent so a previous value can be cleared.
        if !self.should_contain.is_empty() {
            insert(&mut m, "shouldcontain", &self.should_contain);
        } else {
            insert(&mut m, "shouldnotcontain", &self.should_not_contain);
        }

        if !self.username.is_empty() {
            insert(&mut m, "auth", format!("{}:{}", self.username, self.password));
        }

        for (i, (k, v)) in self.request_headers.iter().enumerate() {
            m.insert(format!("requestheader{}", i), format!("{}:{}", k, v));
        }
        m
    }

    fn valid(&self) -> Result<()> {
        valid_common(&self.name, &self.hostname, self.resolution)?;
        if !self.should_contain.is_empty() && !self.should_not_contain.is_empty() {
            return Err(Error::Validation(
                "`should_contain` and `should_not_contain` must not be declared at the same time"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// ICMP ping check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PingCheck {
    pub name: String,
    pub hostname: String,
    pub paused: bool,
    pub resolution: u32,
    pub notify_again_every: u32,
    pub notify_when_backup: bool,
    pub send_notification_when_down: u32,
    pub response_time_threshold: u32,
    pub probe_filters: String,
    pub tags: String,
    pub integration_ids: Vec<i64>,
    pub team_ids: Vec<i64>,
    pub user_ids: Vec<i64>,
}

impl Check for PingCheck {
    fn check_type(&self) -> &'static str {
        "ping"
    }

    fn put_params(&self) -> Params {
        let mut m = Params::new();
        insert(&mut m, "host", &self.hostname);
        insert(&mut m, "integrationids", join_ids(&self.integration_ids));
        insert(&mut m, "name", &self.name);
        insert(&mut m, "notifyagainevery", self.notify_again_every);
        insert(&mut m, "notifywhenbackup", self.notify_when_backup);
        insert(&mut m, "paused", self.paused);
        insert(&mut m, "probe_filters", &self.probe_filters);
        insert(&mut m, "tags", &self.tags);
        insert(&mut m, "teamids", join_ids(&self.team_ids));
        insert(&mut m, "userids", join_ids(&self.user_ids));
        insert_non_zero(&mut m, "resolution", self.resolution);
        insert_non_zero(&mut m, "sendnotificationwhendown", self.send_notification_when_down);
        insert_non_zero(&mut m, "responsetime_threshold", self.response_time_threshold);
        m
    }

    fn valid(&self) -> Result<()> {
        valid_common(&self.name, &self.hostname, self.resolution)
    }
}

/// TCP port check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TcpCheck {
    pub name: String,
    pub hostname: String,
    pub port: u32,
    pub custom_message: String,
    pub ipv6: bool,
    pub paused: bool,
    pub resolution: u32,
    pub notify_again_every: u32,
    pub notify_when_backup: bool,
    pub send_notification_when_down: u32,
    pub response_time_threshold: u32,
    pub string_to_send: String,
    pub string_to_expect: String,
    pub probe_filters: String,
    pub tags: String,
    pub integration_ids: Vec<i64>,
    pub team_ids: Vec<i64>,
    pub user_ids: Vec<i64>,
}

impl Check for TcpCheck {
    fn check_type(&self) -> &'static str {
        "tcp"
    }

    fn put_params(&self) -> Params {
        let mut m = Params::new();
        insert(&mut m, "custom_message", &self.custom_message);
        insert(&mut m, "host", &self.hostname);
        insert(&mut m, "integrationids", join_ids(&self.integration_ids));
        insert(&mut m, "ipv6", self.ipv6);
        insert(&mut m, "name", &self.name);
        insert(&mut m, "notifyagainevery", self.notify_again_every);
        insert(&mut m, "notifywhenbackup", self.notify_when_backup);
        insert(&mut m, "paused", self.paused);
        insert(&mut m, "port", self.port);
        insert(&mut m, "probe_filters", &self.probe_filters);
        insert(&mut m, "tags", &self.tags);
        insert(&mut m, "teamids", join_ids(&self.team_ids));
        insert(&mut m, "userids", join_ids(&self.user_ids));
        insert_non_zero(&mut m, "resolution", self.resolution);
        insert_non_zero(&mut m, "responsetime_threshold", self.response_time_threshold);
        insert_non_zero(&mut m, "sendnotificationwhendown", self.send_notification_when_down);
        if !self.string_to_send.is_empty() {
            insert(&mut m, "stringtosend", &self.string_to_send);
        }
        if !self.string_to_expect.is_empty() {
            insert(&mut m, "stringtoexpect", &self.string_to_expect);
        }
        m
    }

    fn valid(&self) -> Result<()> {
        valid_common(&self.name, &self.hostname, self.resolution)?;
        if !(1..=65535).contains(&self.port) {
            return Err(Error::Validation(
                "invalid value for `port`, must be an integer >= 1 and <= 65535".to_string(),
            ));
        }
        Ok(())
    }
}

/// DNS resolution check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsCheck {
    pub name: String,
    pub hostname: String,
    pub expected_ip: String,
    pub name_server: String,
    pub ipv6: bool,
    pub paused: bool,
    pub resolution: u32,
    pub notify_again_every: u32,
    pub notify_when_backup: bool,
    pub send_notification_when_down: u32,
    pub probe_filters: String,
    pub tags: String,
    pub integration_ids: Vec<i64>,
    pub team_ids: Vec<i64>,
    pub user_ids: Vec<i64>,
}

impl Check for DnsCheck {
    fn check_type(&self) -> &'static str {
        "dns"
    }

    fn put_params(&self) -> Params {
        let mut m = Params::new();
        insert(&mut m, "expectedip", &self.expected_ip);
        insert(&mut m, "host", &self.hostname);
        insert(&mut m, "integrationids", join_ids(&self.integration_ids));
        insert(&mut m, "ipv6", self.ipv6);
        insert(&mut m, "name", &self.name);
        insert(&mut m, "nameserver", &self.name_server);
        insert(&mut m, "notifyagainevery", self.notify_again_every);
        insert(&mut m, "notifywhenbackup", self.notify_when_backup);
        insert(&mut m, "paused", self.paused);
        insert(&mut m, "probe_filters", &self.probe_filters);
        insert(&mut m, "tags", &self.tags);
        insert(&mut m, "teamids", join_ids(&self.team_ids));
        insert(&mut m, "userids", join_ids(&self.user_ids));
        insert_non_zero(&mut m, "resolution", self.resolution);
        insert_non_zero(&mut m, "sendnotificationwhendown", self.send_notification_when_down);
        m
    }

    fn valid(&self) -> Result<()> {
        valid_common(&self.name, &self.hostname, self.resolution)?;
        if self.expected_ip.is_empty() {
            return Err(Error::Validation(
                "invalid value for `expected_ip`, must contain non-empty string".to_string(),
            ));
        }
        if self.name_server.is_empty() {
            return Err(Error::Validation(
                "invalid value for `name_server`, must contain non-empty string".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query for `/summary.performance/{id}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPerformanceRequest {
    pub id: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
    /// `hour`, `day` or `week`; empty for the API default.
    pub resolution: String,
    pub include_uptime: bool,
    pub order: String,
    pub probes: String,
}

impl SummaryPerformanceRequest {
    pub fn valid(&self) -> Result<()> {
        if self.id == 0 {
            return Err(Error::Validation("missing check id".to_string()));
        }
        if !VALID_SUMMARY_RESOLUTIONS.contains(&self.resolution.as_str()) {
            return Err(Error::Validation(
                "resolution must be one of: hour, day, week".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_params(&self) -> Params {
        let mut m = Params::new();
        if !self.resolution.is_empty() {
            insert(&mut m, "resolution", &self.resolution);
        }
        if self.include_uptime {
            insert(&mut m, "includeuptime", "true");
        }
        if let Some(from) = self.from {
            insert(&mut m, "from", from);
        }
        if let Some(to) = self.to {
            insert(&mut m, "to", to);
        }
        if !self.order.is_empty() {
            insert(&mut m, "order", &self.order);
        }
        if !self.probes.is_empty() {
            insert(&mut m, "probes", &self.probes);
        }
        m
    }
}

fn insert(m: &mut Params, key: &str, value: impl ToString) {
    m.insert(key.to_string(), value.to_string());
}

fn insert_non_zero(m: &mut Params, key: &str, value: u32) {
    if value != 0 {
        insert(m, key, value);
    }
}

fn valid_common(name: &str, hostname: &str, resolution: u32) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation(
            "invalid value for `name`, must contain non-empty string".to_string(),
        ));
    }
    if hostname.is_empty() {
        return Err(Error::Validation(
            "invalid value for `hostname`, must contain non-empty string".to_string(),
        ));
    }
    // 0 lets the API apply its default of 5.
    if !VALID_RESOLUTIONS.contains(&resolution) {
        return Err(Error::Validation(format!(
            "invalid value {} for `resolution`, allowed values are [1,5,15,30,60]",
            resolution
        )));
    }
    Ok(())
}
