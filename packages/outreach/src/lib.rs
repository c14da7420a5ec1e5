// ABOUTME: Email outreach for partner agencies and wellness businesses
// ABOUTME: Discovery, contact book, SendGrid campaigns and AI-written emails

pub mod campaigns;
pub mod contacts;
pub mod copywriter;
pub mod error;
pub mod finder;
pub mod mailer;
pub mod types;

pub use campaigns::{create_html_template, default_templates, CampaignRunner, DEFAULT_BATCH_SIZE};
pub use contacts::ContactBook;
pub use copywriter::{parse_email_reply, EmailBrief, EmailCopywriter, EmailLength};
pub use error::{OutreachError, OutreachResult};
pub use finder::{extract_emails_from_html, validate_email, EmailFinder};
pub use mailer::{personalize, SendGridMailer};
pub use types::{
    CampaignStats, CompanyResult, ContactStatus, EmailCampaign, EmailContact, EmailSend,
    EmailTemplate, SaveStats, SendResult, SendStatus,
};
