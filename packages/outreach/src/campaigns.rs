// ABOUTME: Campaign runs that mail a template to selected contacts
// ABOUTME: Also holds the HTML wrapper and the default outreach templates

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use crate::contacts::ContactBook;
use crate::error::OutreachResult;
use crate::mailer::{personalize, SendGridMailer};
use crate::types::{contact_key, CampaignStats, ContactStatus, EmailTemplate, SendStatus};

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Fixed pause after each full batch
pub const BATCH_PAUSE: Duration = Duration::from_secs(2);

pub struct CampaignRunner {
    contacts: ContactBook,
    mailer: SendGridMailer,
}

impl CampaignRunner {
    pub fn new(contacts: ContactBook, mailer: SendGridMailer) -> Self {
        Self { contacts, mailer }
    }

    pub fn mailer(&self) -> &SendGridMailer {
        &self.mailer
    }

    /// Mail every selected contact that has not been contacted yet.
    /// Subject and template are personalized per contact.
    pub async fn send_campaign(
        &self,
        campaign_id: &str,
        contact_emails: &[String],
        subject: &str,
        template: &str,
        batch_size: usize,
    ) -> OutreachResult<CampaignStats> {
        let selected: Vec<String> = contact_emails.iter().map(|e| contact_key(e)).collect();
        let targets: Vec<_> = self
            .contacts
            .list_contacts()
            .await?
            .into_iter()
            .filter(|c| selected.contains(&c.key()))
            .collect();

        let mut stats = CampaignStats::default();
        let total = targets.len();
        for (i, contact) in targets.iter().enumerate() {
            let position = i + 1;
            if contact.is_contacted() {
                stats.skipped += 1;
                continue;
            }

            let result = self
                .mailer
                .send_email(
                    &contact.email,
                    &personalize(subject, contact),
                    &personalize(template, contact),
                )
                .await;

            let status = if result.success {
                SendStatus::Sent
            } else {
                SendStatus::Failed
            };
            let recorded = match self
                .contacts
                .record_send(campaign_id, &contact.email, status, result.message_id.clone())
                .await
            {
                Ok(_) if result.success => self
                    .contacts
                    .update_status(&contact.email, ContactStatus::Contacted)
                    .await,
                Ok(_) => Ok(()),
                Err(e) => Err(e),
            };

            match (result.success, recorded) {
                (true, Ok(())) => {
                    stats.sent += 1;
                    info!("[{}/{}] Sent to {}", position, total, contact.email);
                }
                (false, Ok(())) => {
                    stats.failed += 1;
                    warn!(
                        "[{}/{}] Failed: {}",
                        position,
                        total,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
                (_, Err(e)) => {
                    stats.failed += 1;
                    warn!("Error recording send to {}: {}", contact.email, e);
                }
            }

            if batch_size > 0 && position % batch_size == 0 {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
        }

        info!(
            "Campaign {} finished: {} sent, {} failed, {} skipped",
            campaign_id, stats.sent, stats.failed, stats.skipped
        );
        Ok(stats)
    }
}

/// Wrap content in the branded HTML email layout
pub fn create_html_template(content: &str, include_unsubscribe: bool) -> String {
    let unsubscribe = if include_unsubscribe {
        r##"<div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; font-size: 12px; color: #999;">
            <p>If you no longer wish to receive these emails, <a href="{{unsubscribe_url}}" style="color: #999;">unsubscribe here</a>.</p>
        </div>"##
    } else {
        ""
    };

    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ text-align: center; padding: 20px 0; border-bottom: 2px solid #f0f0f0; }}
        .content {{ padding: 30px 0; }}
        .button {{ display: inline-block; padding: 12px 30px; background-color: #007bff; color: white !important; text-decoration: none; border-radius: 5px; margin: 20px 0; }}
        .footer {{ text-align: center; padding: 20px 0; font-size: 12px; color: #999; }}
    </style>
</head>
<body>
    <div class="header">
        <h2>Elbitat</h2>
    </div>
    <div class="content">
        {content}
    </div>
    <div class="footer">
        {unsubscribe}
        <p>&copy; {year} Elbitat. All rights reserved.</p>
    </div>
</body>
</html>
"##,
        content = content,
        unsubscribe = unsubscribe,
        year = Utc::now().year(),
    )
}

/// Built-in templates by name
pub fn default_templates() -> BTreeMap<&'static str, EmailTemplate> {
    let mut templates = BTreeMap::new();
    templates.insert(
        "Introduction",
        EmailTemplate {
            subject: "Partnership Opportunity with Elbitat".to_string(),
            body: r##"<p>Hi {{first_name}},</p>

<p>I came across {{company_name}} and was impressed by your work in the wellness industry.</p>

<p>I'm reaching out from Elbitat, a digital marketing agency specializing in holistic wellness brands. We help agencies like yours amplify their reach through strategic social media campaigns and content creation.</p>

<p>I'd love to explore how we might collaborate. Are you open to a brief call next week?</p>

<a href="#" class="button">Schedule a Call</a>

<p>Best regards,<br>
The Elbitat Team</p>"##
                .to_string(),
        },
    );
    templates.insert(
        "Follow-up",
        EmailTemplate {
            subject: "Following up - {{company_name}}".to_string(),
            body: r##"<p>Hi {{first_name}},</p>

<p>I wanted to follow up on my previous message about potential collaboration opportunities between Elbitat and {{company_name}}.</p>

<p>We've recently helped several wellness agencies in {{country}} increase their social media engagement by an average of 150%. I believe we could create similar results for your agency.</p>

<p>Would you be interested in seeing some case studies?</p>

<p>Best regards,<br>
The Elbitat Team</p>"##
                .to_string(),
        },
    );
    templates.insert(
        "Service Announcement",
        EmailTemplate {
            subject: "New Social Media Management Services".to_string(),
            body: r##"<p>Hi {{first_name}},</p>

<p>I hope this email finds you well!</p>

<p>I wanted to share an exciting update from Elbitat - we've launched a comprehensive social media management service specifically designed for wellness agencies.</p>

<p><strong>What's included:</strong></p>
<ul>
    <li>AI-powered content creation</li>
    <li>Multi-platform scheduling</li>
    <li>Performance analytics</li>
    <li>Dedicated account manager</li>
</ul>

<a href="#" class="button">Learn More</a>

<p>Best regards,<br>
The Elbitat Team</p>"##
                .to_string(),
        },
    );
    templates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_template_wraps_content() {
        let html = create_html_template("<p>Hello</p>", true);
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains("{{unsubscribe_url}}"));
        assert!(html.contains(&format!("&copy; {} Elbitat", Utc::now().year())));

        let plain = create_html_template("<p>Hello</p>", false);
        assert!(!plain.contains("unsubscribe"));
    }

    #[test]
    fn test_default_templates() {
        let templates = default_templates();
        assert_eq!(templates.len(), 3);
        assert!(templates["Follow-up"].subject.contains("{{company_name}}"));
    }
}
