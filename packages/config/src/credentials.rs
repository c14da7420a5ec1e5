// ABOUTME: Third-party service credentials loaded from the environment
// ABOUTME: Posting adapters and the outreach mailer check these before any network call

use crate::constants;
use crate::env::env_non_empty;

/// API credentials for every external service the agent talks to.
///
/// Empty strings in the environment are treated the same as unset variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub meta_access_token: Option<String>,
    pub meta_page_id: Option<String>,
    pub meta_instagram_account_id: Option<String>,
    pub tiktok_access_token: Option<String>,
    pub tiktok_open_id: Option<String>,
    pub openai_api_key: Option<String>,
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_from_email: Option<String>,
    pub serper_api_key: Option<String>,
}

impl ServiceCredentials {
    pub fn from_env() -> Self {
        Self {
            meta_access_token: env_non_empty(constants::META_ACCESS_TOKEN),
            meta_page_id: env_non_empty(constants::META_PAGE_ID),
            meta_instagram_account_id: env_non_empty(constants::META_INSTAGRAM_ACCOUNT_ID),
            tiktok_access_token: env_non_empty(constants::TIKTOK_ACCESS_TOKEN),
            tiktok_open_id: env_non_empty(constants::TIKTOK_OPEN_ID),
            openai_api_key: env_non_empty(constants::OPENAI_API_KEY),
            sendgrid_api_key: env_non_empty(constants::SENDGRID_API_KEY),
            sendgrid_from_email: env_non_empty(constants::SENDGRID_FROM_EMAIL),
            serper_api_key: env_non_empty(constants::SERPER_API_KEY),
        }
    }

    /// Instagram and Facebook share one Meta app; all three values are needed
    pub fn is_meta_configured(&self) -> bool {
        self.meta_access_token.is_some()
            && self.meta_page_id.is_some()
            && self.meta_instagram_account_id.is_some()
    }

    pub fn is_tiktok_configured(&self) -> bool {
        self.tiktok_access_token.is_some() && self.tiktok_open_id.is_some()
    }

    pub fn is_openai_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn is_sendgrid_configured(&self) -> bool {
        self.sendgrid_api_key.is_some()
    }

    pub fn is_serper_configured(&self) -> bool {
        self.serper_api_key.is_some()
    }
}
