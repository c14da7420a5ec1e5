// ABOUTME: Facebook page publisher using the Meta Graph API
// ABOUTME: Uploads photos unpublished, then creates one feed post attaching them

use std::path::Path;

use async_trait::async_trait;
use elbitat_core::{Draft, Platform};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::error::PublishResult;
use crate::http::{build_client, json_or_error, string_at};
use crate::{Publisher, GRAPH_API_BASE_URL};

pub struct FacebookPublisher {
    client: Client,
    base_url: String,
    access_token: String,
    page_id: String,
}

impl FacebookPublisher {
    pub fn new(access_token: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            base_url: GRAPH_API_BASE_URL.to_string(),
            access_token: access_token.into(),
            page_id: page_id.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Upload one local photo without publishing it; returns the photo id
    async fn upload_photo(&self, path: &Path) -> PublishResult<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();
        let form = Form::new().part("source", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(format!("{}/{}/photos", self.base_url, self.page_id))
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("published", "false"),
            ])
            .multipart(form)
            .send()
            .await?;
        let body = json_or_error(response).await?;
        string_at(&body, "/id")
    }

    pub async fn publish_with_images(&self, images: &[String], message: &str) -> PublishResult<String> {
        let mut attached_media = Vec::with_capacity(images.len());
        for image in images {
            let id = self.upload_photo(Path::new(image)).await?;
            debug!("Uploaded Facebook photo {} from {}", id, image);
            attached_media.push(json!({ "media_fbid": id }));
        }

        let response = self
            .client
            .post(format!("{}/{}/feed", self.base_url, self.page_id))
            .json(&json!({
                "message": message,
                "attached_media": attached_media,
                "access_token": self.access_token,
            }))
            .send()
            .await?;
        let body = json_or_error(response).await?;
        string_at(&body, "/id")
    }
}

#[async_trait]
impl Publisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    async fn publish(&self, draft: &Draft) -> PublishResult<String> {
        let message = draft
            .copy_by_platform
            .facebook
            .as_ref()
            .map(|c| c.message.as_str())
            .unwrap_or_default();

        self.publish_with_images(&draft.selected_images, message)
            .await
    }
}
