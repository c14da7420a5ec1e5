// ABOUTME: Publishing adapters that post approved drafts to social platforms
// ABOUTME: One Publisher per platform plus the auto-poster that records outcomes

use async_trait::async_trait;
use elbitat_core::{Draft, Platform, PostOutcome};
use tracing::{error, info};

pub mod auto_poster;
pub mod error;
pub mod facebook;
mod http;
pub mod instagram;
pub mod tiktok;

pub use auto_poster::{ApiConfiguration, AutoPoster, PlatformEndpoints};
pub use error::{PublishError, PublishResult};
pub use facebook::FacebookPublisher;
pub use instagram::InstagramPublisher;
pub use tiktok::TikTokPublisher;

/// Graph API root shared by Instagram and Facebook
pub const GRAPH_API_BASE_URL: &str = "https://graph.facebook.com/v18.0";
pub const TIKTOK_API_BASE_URL: &str = "https://open-api.tiktok.com";

/// A platform adapter that can publish a draft
#[async_trait]
pub trait Publisher: Send + Sync {
    fn platform(&self) -> Platform;

    /// Publish the draft and return the platform's post id
    async fn publish(&self, draft: &Draft) -> PublishResult<String>;

    /// Publish and fold the result into a `PostOutcome`. Never fails.
    async fn post_from_draft(&self, draft: &Draft) -> PostOutcome {
        let platform = self.platform();
        if !draft.request.has_platform(platform) {
            return PostOutcome::skipped(
                platform,
                format!("{} not in platforms", platform.display_name()),
            );
        }

        match self.publish(draft).await {
            Ok(post_id) => {
                info!(
                    "Published '{}' to {} as {}",
                    draft.request.title,
                    platform.display_name(),
                    post_id
                );
                PostOutcome::success(platform, post_id)
            }
            Err(e) => {
                error!(
                    "Failed to publish '{}' to {}: {}",
                    draft.request.title,
                    platform.display_name(),
                    e
                );
                PostOutcome::error(platform, e.to_string())
            }
        }
    }
}
