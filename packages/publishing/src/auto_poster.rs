// ABOUTME: Auto-poster that publishes a draft to every target platform in turn
// ABOUTME: Reports per-platform outcomes and records them as a posted result

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use elbitat_config::ServiceCredentials;
use elbitat_core::{Draft, Platform, PostOutcome, PostedResult};
use elbitat_storage::{Collection, RecordStore, RecordStoreExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    FacebookPublisher, InstagramPublisher, Publisher, TikTokPublisher, GRAPH_API_BASE_URL,
    TIKTOK_API_BASE_URL,
};

/// API roots the publishers talk to
#[derive(Debug, Clone)]
pub struct PlatformEndpoints {
    pub graph_api: String,
    pub tiktok_api: String,
    pub instagram_upload_delay: Duration,
}

impl Default for PlatformEndpoints {
    fn default() -> Self {
        Self {
            graph_api: GRAPH_API_BASE_URL.to_string(),
            tiktok_api: TIKTOK_API_BASE_URL.to_string(),
            instagram_upload_delay: Duration::from_secs(1),
        }
    }
}

/// Which external services have credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiConfiguration {
    pub meta: bool,
    pub tiktok: bool,
    pub openai: bool,
    pub sendgrid: bool,
    pub serper: bool,
}

pub struct AutoPoster {
    credentials: ServiceCredentials,
    endpoints: PlatformEndpoints,
    store: Option<Arc<dyn RecordStore>>,
}

impl AutoPoster {
    pub fn new(credentials: ServiceCredentials, store: Option<Arc<dyn RecordStore>>) -> Self {
        Self {
            credentials,
            endpoints: PlatformEndpoints::default(),
            store,
        }
    }

    pub fn with_endpoints(mut self, endpoints: PlatformEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn check_api_configuration(&self) -> ApiConfiguration {
        let c = &self.credentials;
        ApiConfiguration {
            meta: c.is_meta_configured(),
            tiktok: c.is_tiktok_configured(),
            openai: c.is_openai_configured(),
            sendgrid: c.is_sendgrid_configured(),
            serper: c.is_serper_configured(),
        }
    }

    /// Publisher for a platform, or the reason it cannot be built
    fn publisher_for(&self, platform: Platform) -> Result<Box<dyn Publisher>, &'static str> {
        let c = &self.credentials;
        match platform {
            Platform::Instagram | Platform::Facebook => {
                let (Some(token), Some(page_id), Some(account_id)) = (
                    &c.meta_access_token,
                    &c.meta_page_id,
                    &c.meta_instagram_account_id,
                ) else {
                    return Err("Meta API credentials not set");
                };
                if platform == Platform::Instagram {
                    Ok(Box::new(
                        InstagramPublisher::new(token, account_id)
                            .with_base_url(&self.endpoints.graph_api)
                            .with_upload_delay(self.endpoints.instagram_upload_delay),
                    ))
                } else {
                    Ok(Box::new(
                        FacebookPublisher::new(token, page_id)
                            .with_base_url(&self.endpoints.graph_api),
                    ))
                }
            }
            Platform::TikTok => {
                let (Some(token), Some(open_id)) = (&c.tiktok_access_token, &c.tiktok_open_id)
                else {
                    return Err("TikTok API credentials not set");
                };
                Ok(Box::new(
                    TikTokPublisher::new(token, open_id).with_base_url(&self.endpoints.tiktok_api),
                ))
            }
        }
    }

    /// Post a draft to `platforms`, or to the request's platforms when `None`.
    /// Platforms without credentials are reported as not configured and never contacted.
    pub async fn auto_post_draft(
        &self,
        draft: &Draft,
        platforms: Option<&[Platform]>,
    ) -> BTreeMap<Platform, PostOutcome> {
        let targets = match platforms {
            Some(p) if !p.is_empty() => p.to_vec(),
            _ => draft.request.platforms.clone(),
        };

        let mut results = BTreeMap::new();
        for platform in targets {
            if results.contains_key(&platform) {
                continue;
            }
            let outcome = match self.publisher_for(platform) {
                Ok(publisher) => publisher.post_from_draft(draft).await,
                Err(reason) => {
                    info!("{} not configured: {}", platform.display_name(), reason);
                    PostOutcome::not_configured(platform, reason)
                }
            };
            results.insert(platform, outcome);
        }

        self.record_results(draft, &results).await;
        results
    }

    async fn record_results(&self, draft: &Draft, results: &BTreeMap<Platform, PostOutcome>) {
        let Some(store) = &self.store else {
            return;
        };
        let posted = PostedResult {
            draft: draft.clone(),
            results: results.clone(),
            posted_at: Utc::now(),
        };
        if let Err(e) = store
            .put_record(Collection::Posted, &posted.key(), &posted)
            .await
        {
            warn!("Failed to save posting results for '{}': {}", draft.request.title, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_api_configuration() {
        let credentials = ServiceCredentials {
            tiktok_access_token: Some("t".to_string()),
            tiktok_open_id: Some("o".to_string()),
            openai_api_key: Some("k".to_string()),
            meta_access_token: Some("m".to_string()),
            ..Default::default()
        };
        let poster = AutoPoster::new(credentials, None);

        assert_eq!(
            poster.check_api_configuration(),
            ApiConfiguration {
                meta: false,
                tiktok: true,
                openai: true,
                sendgrid: false,
                serper: false,
            }
        );
    }
}
