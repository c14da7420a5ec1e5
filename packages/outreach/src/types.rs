// ABOUTME: Outreach records: contacts, campaigns, sends and run statistics
// ABOUTME: Contacts are keyed by lowercased email address

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company found by web search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResult {
    pub company_name: String,
    pub website: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Contacted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailContact {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl EmailContact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            company_name: None,
            website: None,
            country: None,
            industry: None,
            first_name: None,
            source: None,
            status: ContactStatus::New,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> String {
        contact_key(&self.email)
    }

    pub fn is_contacted(&self) -> bool {
        self.status == ContactStatus::Contacted
    }
}

pub fn contact_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCampaign {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub template: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Sent,
    Failed,
}

/// One email sent (or attempted) as part of a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSend {
    pub campaign_id: String,
    pub contact_email: String,
    pub status: SendStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl EmailSend {
    pub fn key(&self) -> String {
        format!("{}__{}", self.campaign_id, contact_key(&self.contact_email))
    }
}

/// Outcome of one SendGrid call. Failures are data, not errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveStats {
    pub saved: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CampaignStats {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_key_is_lowercased() {
        let contact = EmailContact::new("Info@Yoga-Studio.DK");
        assert_eq!(contact.key(), "info@yoga-studio.dk");
    }

    #[test]
    fn test_contact_deserializes_with_defaults() {
        let contact: EmailContact =
            serde_json::from_str(r#"{"email": "hello@spa.se"}"#).unwrap();
        assert_eq!(contact.status, ContactStatus::New);
        assert!(contact.company_name.is_none());
    }
}
