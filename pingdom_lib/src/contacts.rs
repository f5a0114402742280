//! Alerting contacts: `/alerting/contacts`.

use crate::checks::MessageResponse;
use crate::client::Client;
use crate::error::{Error, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const SEVERITIES: [&str; 2] = ["HIGH", "LOW"];

/// An alerting contact. Read-only fields are skipped when sending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(skip_serializing)]
    pub id: i64,
    pub name: String,
    pub paused: bool,
    #[serde(rename = "type", skip_serializing)]
    pub contact_type: String,
    #[serde(skip_serializing)]
    pub owner: bool,
    pub notification_targets: NotificationTargets,
    #[serde(skip_serializing)]
    pub teams: Vec<ContactTeam>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTargets {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sms: Vec<SmsNotification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<EmailNotification>,
}

impl NotificationTargets {
    pub fn is_empty(&self) -> bool {
        self.sms.is_empty() && self.email.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsNotification {
    pub severity: String,
    pub country_code: String,
    pub number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailNotification {
    pub severity: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactTeam {
    pub id: i64,
    pub name: String,
}

impl Contact {
    pub fn valid(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation(
                "invalid value for `name`, must contain non-empty string".to_string(),
            ));
        }
        if self.notification_targets.is_empty() {
            return Err(Error::Validation(
                "a contact needs at least one notification target".to_string(),
            ));
        }
        let severities = self
            .notification_targets
            .sms
            .iter()
            .map(|s| s.severity.as_str())
            .chain(self.notification_targets.email.iter().map(|e| e.severity.as_str()));
        for severity in severities {
            if !SEVERITIES.contains(&severity) {
                return Err(Error::Validation(format!(
                    "invalid severity {:?}, must be HIGH or LOW",
                    severity
                )));
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ListContacts {
    #[serde(default)]
    contacts: Vec<Contact>,
}

#[derive(Deserialize)]
struct ContactDetails {
    contact: Contact,
}

/// Operations on alerting contacts.
pub struct Contacts<'a> {
    client: &'a Client,
}

impl<'a> Contacts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Contact>> {
        let req = self.client.new_request(Method::GET, "/alerting/contacts", None)?;
        let res: ListContacts = self.client.fetch(req).await?;
        Ok(res.contacts)
    }

    pub async fn read(&self, id: i64) -> Result<Contact> {
        let path = format!("/alerting/contacts/{}", id);
        let req = self.client.new_request(Method::GET, &path, None)?;
        let res: ContactDetails = self.client.fetch(req).await?;
        Ok(res.contact)
    }

    /// Create a contact; only the id of the returned contact is populated.
    pub async fn create(&self, contact: &Contact) -> Result<Contact> {
        contact.valid()?;
        let body = serde_json::to_string(contact)?;
        let req = self
            .client
            .new_json_request(Method::POST, "/alerting/contacts", body)?;
        let res: ContactDetails = self.client.fetch(req).await?;
        Ok(res.contact)
    }

    pub async fn update(&self, id: i64, contact: &Contact) -> Result<MessageResponse> {
        contact.valid()?;
        let body = serde_json::to_string(contact)?;
        let path = format!("/alerting/contacts/{}", id);
        let req = self.client.new_json_request(Method::PUT, &path, body)?;
        self.client.fetch(req).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse> {
        let path = format!("/alerting/contacts/{}", id);
        let req = self.client.new_request(Method::DELETE, &path, None)?;
        self.client.fetch(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contact() -> Contact {
        Contact {
            name: "John Doe".into(),
            notification_targets: NotificationTargets {
                email: vec![EmailNotification {
                    severity: "HIGH".into(),
                    address: "john@example.com".into(),
                }],
                ..NotificationTargets::default()
            },
            ..Contact::default()
        }
    }

    #[test]
    fn valid_contact() {
        assert!(contact().valid().is_ok());
    }

    #[test]
    fn contact_needs_target_and_severity() {
        let mut c = contact();
        c.notification_targets.email[0].severity = "MEDIUM".into();
        assert!(c.valid().is_err());
        c.notification_targets = NotificationTargets::default();
        assert!(c.valid().is_err());
    }

    #[test]
    fn serialized_contact_omits_read_only_fields() {
        let mut c = contact();
        c.id = 12;
        c.owner = true;
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(
            v,
            json!({
                "name": "John Doe",
                "paused": false,
                "notification_targets": {
                    "email": [{"severity": "HIGH", "address": "john@example.com"}]
                }
            })
        );
    }
}
