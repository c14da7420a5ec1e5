// ABOUTME: Campaign, draft and publishing record types
// ABOUTME: Serialized shapes match the JSON records kept in the workspace collections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::{draft_key, posted_key, request_key, scheduled_key, slugify};

/// Social platform a campaign can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    TikTok,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::Facebook, Platform::TikTok];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::TikTok => "tiktok",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::TikTok => "TikTok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "facebook" | "fb" => Ok(Platform::Facebook),
            "tiktok" | "tik tok" | "tik-tok" => Ok(Platform::TikTok),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

/// Campaign goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    #[default]
    Awareness,
    Bookings,
    Leads,
    Engagement,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Awareness => "awareness",
            Goal::Bookings => "bookings",
            Goal::Leads => "leads",
            Goal::Engagement => "engagement",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "awareness" => Ok(Goal::Awareness),
            "bookings" | "booking" => Ok(Goal::Bookings),
            "leads" | "lead" => Ok(Goal::Leads),
            "engagement" => Ok(Goal::Engagement),
            other => Err(format!("Unknown goal: {}", other)),
        }
    }
}

// Hand-written requests sometimes carry capitalised or unknown goals
impl<'de> Deserialize<'de> for Goal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_platforms() -> Vec<Platform> {
    vec![Platform::Instagram, Platform::Facebook]
}

/// Accepts platform names in any case, drops unknown names and duplicates
fn deserialize_platforms<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Platform>, D::Error> {
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut platforms = Vec::with_capacity(raw.len());
    for name in raw {
        if let Ok(platform) = name.parse::<Platform>() {
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
    }
    Ok(platforms)
}

/// High-level request for an ad campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRequest {
    #[serde(default = "default_title")]
    pub title: String,
    /// Target month, e.g. "2025-07"
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub goal: Goal,
    #[serde(
        default = "default_platforms",
        deserialize_with = "deserialize_platforms"
    )]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub brief: String,
}

impl CampaignRequest {
    pub fn new(title: impl Into<String>, brief: impl Into<String>, platforms: Vec<Platform>) -> Self {
        Self {
            title: title.into(),
            month: None,
            goal: Goal::default(),
            platforms,
            audience: None,
            language: default_language(),
            brief: brief.into(),
        }
    }

    /// Filename-safe slug derived from the title
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// Key of this request in the requests collection
    pub fn key(&self) -> String {
        request_key(&self.slug())
    }

    pub fn has_platform(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// Copy of the request whose brief carries reviewer feedback
    pub fn with_additional_instructions(&self, feedback: &str) -> Self {
        let mut updated = self.clone();
        updated.brief = format!("{}\n\nADDITIONAL INSTRUCTIONS: {}", self.brief, feedback);
        updated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramCopy {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub hashtags: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacebookCopy {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TikTokCopy {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub script: String,
}

/// Text fields for a single platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyFields {
    Instagram(InstagramCopy),
    Facebook(FacebookCopy),
    TikTok(TikTokCopy),
}

impl CopyFields {
    pub fn platform(&self) -> Platform {
        match self {
            CopyFields::Instagram(_) => Platform::Instagram,
            CopyFields::Facebook(_) => Platform::Facebook,
            CopyFields::TikTok(_) => Platform::TikTok,
        }
    }

    /// Named field values in display order
    pub fn values(&self) -> Vec<(&'static str, &str)> {
        match self {
            CopyFields::Instagram(c) => vec![("caption", &c.caption), ("hashtags", &c.hashtags)],
            CopyFields::Facebook(c) => vec![("message", &c.message)],
            CopyFields::TikTok(c) => vec![("caption", &c.caption), ("script", &c.script)],
        }
    }
}

/// Per-platform copy of a draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCopy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<InstagramCopy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<FacebookCopy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<TikTokCopy>,
}

impl PlatformCopy {
    pub fn insert(&mut self, fields: CopyFields) {
        match fields {
            CopyFields::Instagram(c) => self.instagram = Some(c),
            CopyFields::Facebook(c) => self.facebook = Some(c),
            CopyFields::TikTok(c) => self.tiktok = Some(c),
        }
    }

    pub fn get(&self, platform: Platform) -> Option<CopyFields> {
        match platform {
            Platform::Instagram => self.instagram.clone().map(CopyFields::Instagram),
            Platform::Facebook => self.facebook.clone().map(CopyFields::Facebook),
            Platform::TikTok => self.tiktok.clone().map(CopyFields::TikTok),
        }
    }

    pub fn contains(&self, platform: Platform) -> bool {
        match platform {
            Platform::Instagram => self.instagram.is_some(),
            Platform::Facebook => self.facebook.is_some(),
            Platform::TikTok => self.tiktok.is_some(),
        }
    }

    /// Platforms that have copy, in canonical order
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.contains(*p))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms().is_empty()
    }
}

/// Generated copy plus selected images for one campaign request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub request: CampaignRequest,
    #[serde(default)]
    pub copy_by_platform: PlatformCopy,
    #[serde(default)]
    pub selected_images: Vec<String>,
}

impl Draft {
    pub fn key(&self) -> String {
        draft_key(&self.request.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Posted,
}

/// Draft snapshot waiting for publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub draft: Draft,
    #[serde(default)]
    pub publish_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub status: ScheduleStatus,
}

impl ScheduledPost {
    pub fn scheduled(draft: Draft, publish_at: Option<DateTime<Utc>>) -> Self {
        Self {
            draft,
            publish_at,
            approved_at: None,
            approved: false,
            status: ScheduleStatus::Pending,
        }
    }

    pub fn approved(draft: Draft, approved_at: DateTime<Utc>) -> Self {
        Self {
            draft,
            publish_at: None,
            approved_at: Some(approved_at),
            approved: true,
            status: ScheduleStatus::Pending,
        }
    }

    pub fn key(&self) -> String {
        scheduled_key(&self.draft.request.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Success,
    Error,
    Skipped,
    NotConfigured,
}

/// Result of publishing a draft to one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOutcome {
    pub platform: Platform,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PostOutcome {
    pub fn success(platform: Platform, post_id: impl Into<String>) -> Self {
        Self {
            platform,
            status: PostStatus::Success,
            post_id: Some(post_id.into()),
            error: None,
            reason: None,
        }
    }

    pub fn error(platform: Platform, error: impl Into<String>) -> Self {
        Self {
            platform,
            status: PostStatus::Error,
            post_id: None,
            error: Some(error.into()),
            reason: None,
        }
    }

    pub fn skipped(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            platform,
            status: PostStatus::Skipped,
            post_id: None,
            error: None,
            reason: Some(reason.into()),
        }
    }

    pub fn not_configured(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            platform,
            status: PostStatus::NotConfigured,
            post_id: None,
            error: None,
            reason: Some(reason.into()),
        }
    }
}

/// Draft snapshot plus the outcome of each platform call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedResult {
    pub draft: Draft,
    pub results: BTreeMap<Platform, PostOutcome>,
    pub posted_at: DateTime<Utc>,
}

impl PostedResult {
    pub fn key(&self) -> String {
        posted_key(&self.draft.request.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_defaults_from_sparse_json() {
        let request: CampaignRequest = serde_json::from_value(json!({ "title": "Spring" })).unwrap();

        assert_eq!(request.title, "Spring");
        assert_eq!(request.goal, Goal::Awareness);
        assert_eq!(request.platforms, vec![Platform::Instagram, Platform::Facebook]);
        assert_eq!(request.language, "en");
        assert_eq!(request.brief, "");
        assert!(request.month.is_none());
    }

    #[test]
    fn test_platforms_are_parsed_leniently() {
        let request: CampaignRequest = serde_json::from_value(json!({
            "title": "Mixed",
            "platforms": ["Instagram", "TIKTOK", "myspace", "instagram"],
            "goal": "Bookings"
        }))
        .unwrap();

        assert_eq!(request.platforms, vec![Platform::Instagram, Platform::TikTok]);
        assert_eq!(request.goal, Goal::Bookings);
    }

    #[test]
    fn test_unknown_goal_falls_back_to_awareness() {
        let request: CampaignRequest =
            serde_json::from_value(json!({ "title": "X", "goal": "world domination" })).unwrap();
        assert_eq!(request.goal, Goal::Awareness);
    }

    #[test]
    fn test_draft_json_shape() {
        let mut copy = PlatformCopy::default();
        copy.insert(CopyFields::Facebook(FacebookCopy {
            message: "Hello".to_string(),
        }));
        let draft = Draft {
            request: CampaignRequest::new("Summer Special", "Sunsets", vec![Platform::Facebook]),
            copy_by_platform: copy,
            selected_images: vec!["a.jpg".to_string()],
        };

        let value = serde_json::to_value(&draft).unwrap();

        assert_eq!(value["copy_by_platform"], json!({ "facebook": { "message": "Hello" } }));
        assert_eq!(value["request"]["platforms"], json!(["facebook"]));
        assert_eq!(value["selected_images"], json!(["a.jpg"]));
        assert_eq!(draft.key(), "summer_special.draft");
    }

    #[test]
    fn test_platform_copy_tracks_present_platforms() {
        let mut copy = PlatformCopy::default();
        assert!(copy.is_empty());

        copy.insert(CopyFields::TikTok(TikTokCopy {
            caption: "c".to_string(),
            script: "s".to_string(),
        }));
        copy.insert(CopyFields::Instagram(InstagramCopy {
            caption: "c".to_string(),
            hashtags: "#h".to_string(),
        }));

        assert_eq!(copy.platforms(), vec![Platform::Instagram, Platform::TikTok]);
        assert!(copy.get(Platform::Facebook).is_none());
    }

    #[test]
    fn test_posted_result_serializes_platform_keys() {
        let draft = Draft {
            request: CampaignRequest::new("Weekend", "brief", vec![Platform::TikTok]),
            copy_by_platform: PlatformCopy::default(),
            selected_images: vec![],
        };
        let mut results = BTreeMap::new();
        results.insert(
            Platform::TikTok,
            PostOutcome::not_configured(Platform::TikTok, "TikTok API credentials not set"),
        );
        let posted = PostedResult {
            draft,
            results,
            posted_at: Utc::now(),
        };

        let value = serde_json::to_value(&posted).unwrap();
        assert_eq!(value["results"]["tiktok"]["status"], json!("not_configured"));
        assert!(value["results"]["tiktok"].get("post_id").is_none());

        let back: PostedResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.key(), "weekend.posted");
    }

    #[test]
    fn test_additional_instructions_extend_brief() {
        let request = CampaignRequest::new("T", "Original brief", vec![Platform::Facebook]);
        let updated = request.with_additional_instructions("More sunsets");
        assert_eq!(updated.brief, "Original brief\n\nADDITIONAL INSTRUCTIONS: More sunsets");
        assert_eq!(request.brief, "Original brief");
    }
}
