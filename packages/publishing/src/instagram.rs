// ABOUTME: Instagram publisher using the Meta Graph API content publishing flow
// ABOUTME: Uploads media containers, builds a carousel when needed, then publishes

use std::time::Duration;

use async_trait::async_trait;
use elbitat_core::{Draft, Platform};
use reqwest::Client;
use tracing::debug;

use crate::error::{PublishError, PublishResult};
use crate::http::{build_client, json_or_error, string_at};
use crate::{Publisher, GRAPH_API_BASE_URL};

/// Carousel limit enforced by Instagram
pub const MAX_CAROUSEL_ITEMS: usize = 10;

const DEFAULT_UPLOAD_DELAY: Duration = Duration::from_secs(1);

pub struct InstagramPublisher {
    client: Client,
    base_url: String,
    access_token: String,
    account_id: String,
    upload_delay: Duration,
}

impl InstagramPublisher {
    pub fn new(access_token: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            base_url: GRAPH_API_BASE_URL.to_string(),
            access_token: access_token.into(),
            account_id: account_id.into(),
            upload_delay: DEFAULT_UPLOAD_DELAY,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Pause between media uploads to stay under the Graph API rate limit
    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    fn media_url(&self) -> String {
        format!("{}/{}/media", self.base_url, self.account_id)
    }

    /// Create one media container. The image must be reachable by URL from Meta's servers.
    async fn create_container(&self, params: &[(&str, &str)]) -> PublishResult<String> {
        let mut query = params.to_vec();
        query.push(("access_token", self.access_token.as_str()));

        let response = self
            .client
            .post(self.media_url())
            .query(&query)
            .send()
            .await?;
        let body = json_or_error(response).await?;
        string_at(&body, "/id")
    }

    async fn publish_container(&self, creation_id: &str) -> PublishResult<String> {
        let response = self
            .client
            .post(format!("{}/{}/media_publish", self.base_url, self.account_id))
            .query(&[
                ("creation_id", creation_id),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;
        let body = json_or_error(response).await?;
        string_at(&body, "/id")
    }

    /// Publish images with a caption: single image post or carousel
    pub async fn publish_images(&self, images: &[String], caption: &str) -> PublishResult<String> {
        if images.is_empty() {
            return Err(PublishError::NoMedia(
                "Instagram posts need at least one image".to_string(),
            ));
        }

        let images = &images[..images.len().min(MAX_CAROUSEL_ITEMS)];
        if images.len() == 1 {
            let container = self
                .create_container(&[("image_url", images[0].as_str()), ("caption", caption)])
                .await?;
            return self.publish_container(&container).await;
        }

        let mut children = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            if i > 0 && !self.upload_delay.is_zero() {
                tokio::time::sleep(self.upload_delay).await;
            }
            let id = self
                .create_container(&[("image_url", image.as_str()), ("is_carousel_item", "true")])
                .await?;
            debug!("Created Instagram media container {} for {}", id, image);
            children.push(id);
        }

        let children = children.join(",");
        let carousel = self
            .create_container(&[
                ("media_type", "CAROUSEL"),
                ("children", children.as_str()),
                ("caption", caption),
            ])
            .await?;
        self.publish_container(&carousel).await
    }
}

/// `caption\n\nhashtags`, trimmed
pub fn full_caption(caption: &str, hashtags: &str) -> String {
    format!("{}\n\n{}", caption, hashtags).trim().to_string()
}

#[async_trait]
impl Publisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn publish(&self, draft: &Draft) -> PublishResult<String> {
        let (caption, hashtags) = draft
            .copy_by_platform
            .instagram
            .as_ref()
            .map(|c| (c.caption.as_str(), c.hashtags.as_str()))
            .unwrap_or_default();

        self.publish_images(&draft.selected_images, &full_caption(caption, hashtags))
            .await
    }
}
