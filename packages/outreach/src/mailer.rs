// ABOUTME: SendGrid mailer and template personalization
// ABOUTME: Send failures come back as SendResult values so campaigns can keep going

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::types::{EmailContact, SendResult};

pub const SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";
pub const DEFAULT_FROM_EMAIL: &str = "noreply@elbitat.com";

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Fill `{{email}}`, `{{company_name}}`, `{{website}}`, `{{first_name}}` and `{{country}}`.
/// A missing first name is guessed from the email local part.
pub fn personalize(template: &str, contact: &EmailContact) -> String {
    let first_name = match contact.first_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            let local = contact.email.split('@').next().unwrap_or_default();
            capitalize(local.split('.').next().unwrap_or_default())
        }
    };

    template
        .replace("{{email}}", &contact.email)
        .replace("{{company_name}}", contact.company_name.as_deref().unwrap_or_default())
        .replace("{{website}}", contact.website.as_deref().unwrap_or_default())
        .replace("{{first_name}}", &first_name)
        .replace("{{country}}", contact.country.as_deref().unwrap_or_default())
}

pub struct SendGridMailer {
    client: Client,
    api_key: Option<String>,
    from_email: String,
    base_url: String,
}

impl SendGridMailer {
    pub fn new(api_key: Option<String>, from_email: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            from_email: from_email.unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            base_url: SENDGRID_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn from_email(&self) -> &str {
        &self.from_email
    }

    pub async fn send_email(&self, to: &str, subject: &str, html: &str) -> SendResult {
        let Some(api_key) = &self.api_key else {
            return SendResult::failure("SendGrid API key not configured");
        };

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.from_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });

        let response = match self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("SendGrid request to {} failed: {}", to, e);
                return SendResult::failure(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let message_id = response
            .headers()
            .get("X-Message-Id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if matches!(status, 200 | 201 | 202) {
            debug!("SendGrid accepted email to {}", to);
            SendResult {
                success: true,
                status_code: Some(status),
                message_id,
                error: None,
            }
        } else {
            let body = response.text().await.unwrap_or_default();
            SendResult {
                success: false,
                status_code: Some(status),
                message_id,
                error: Some(body),
            }
        }
    }

    /// Send a template filled with sample contact data
    pub async fn send_test_email(&self, template: &str, subject: &str, to: &str) -> SendResult {
        let mut sample = EmailContact::new(to);
        sample.company_name = Some("Test Company AS".to_string());
        sample.website = Some("https://testcompany.com".to_string());
        sample.first_name = Some("John".to_string());
        sample.country = Some("Denmark".to_string());

        self.send_email(
            to,
            &personalize(subject, &sample),
            &personalize(template, &sample),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_personalize_derives_first_name_from_email() {
        let mut contact = EmailContact::new("maria.rossi@wellness.it");
        contact.company_name = Some("Wellness Italia".to_string());

        let text = personalize(
            "Hi {{first_name}} at {{company_name}} ({{country}}) - {{email}}",
            &contact,
        );
        assert_eq!(text, "Hi Maria at Wellness Italia () - maria.rossi@wellness.it");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_a_failed_result() {
        let mailer = SendGridMailer::new(None, None);
        let result = mailer.send_email("a@b.dk", "Hello", "<p>Hi</p>").await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("SendGrid API key not configured"));
        assert_eq!(mailer.from_email(), DEFAULT_FROM_EMAIL);
    }
}
