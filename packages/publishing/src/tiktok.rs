// ABOUTME: TikTok publisher using the share video upload flow
// ABOUTME: Initializes an upload, sends the media file, then publishes with the caption

use std::path::Path;

use async_trait::async_trait;
use elbitat_core::{Draft, Platform};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{PublishError, PublishResult};
use crate::http::{build_client, ensure_success, json_or_error, string_at};
use crate::{Publisher, TIKTOK_API_BASE_URL};

pub struct TikTokPublisher {
    client: Client,
    base_url: String,
    access_token: String,
    open_id: String,
}

impl TikTokPublisher {
    pub fn new(access_token: impl Into<String>, open_id: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            base_url: TIKTOK_API_BASE_URL.to_string(),
            access_token: access_token.into(),
            open_id: open_id.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn init_upload(&self) -> PublishResult<String> {
        let response = self
            .client
            .post(format!("{}/share/video/upload/", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&json!({ "open_id": self.open_id }))
            .send()
            .await?;
        let body = json_or_error(response).await?;
        string_at(&body, "/data/upload_url")
    }

    async fn upload_media(&self, upload_url: &str, path: &Path) -> PublishResult<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();
        let form = Form::new().part("video", Part::bytes(bytes).file_name(file_name));

        let response = self.client.post(upload_url).multipart(form).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn publish_upload(&self, caption: &str) -> PublishResult<String> {
        let response = self
            .client
            .post(format!("{}/share/video/publish/", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&json!({
                "open_id": self.open_id,
                "caption": caption,
                "privacy_level": "PUBLIC_TO_EVERYONE",
                "disable_duet": false,
                "disable_comment": false,
                "disable_stitch": false,
            }))
            .send()
            .await?;
        let body = json_or_error(response).await?;
        string_at(&body, "/data/share_id")
    }

    /// Upload one media file and publish it; returns the share id
    pub async fn publish_media(&self, media: &Path, caption: &str) -> PublishResult<String> {
        let upload_url = self.init_upload().await?;
        debug!("TikTok upload initialized at {}", upload_url);
        self.upload_media(&upload_url, media).await?;
        let share_id = self.publish_upload(caption).await?;
        info!("TikTok share {} created", share_id);
        Ok(share_id)
    }
}

/// `caption\n\nscript` when a script exists
pub fn tiktok_caption(caption: &str, script: &str) -> String {
    if script.trim().is_empty() {
        caption.to_string()
    } else {
        format!("{}\n\n{}", caption, script).trim().to_string()
    }
}

#[async_trait]
impl Publisher for TikTokPublisher {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    async fn publish(&self, draft: &Draft) -> PublishResult<String> {
        // Still images are uploaded as-is; video rendering happens outside the agent
        let media = draft.selected_images.first().ok_or_else(|| {
            PublishError::NoMedia("TikTok posts need a media file".to_string())
        })?;

        let caption = draft
            .copy_by_platform
            .tiktok
            .as_ref()
            .map(|c| tiktok_caption(&c.caption, &c.script))
            .unwrap_or_default();

        self.publish_media(Path::new(media), &caption).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_includes_script() {
        assert_eq!(tiktok_caption("Sunset", ""), "Sunset");
        assert_eq!(tiktok_caption("Sunset", "Drone shot"), "Sunset\n\nDrone shot");
    }
}
