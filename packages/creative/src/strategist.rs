// ABOUTME: Marketing strategist that plans multi-post campaigns through conversation
// ABOUTME: Converts a generated plan into dated campaign requests

use chrono::{Duration, NaiveDate};
use elbitat_ai::{strip_code_fences, AIService, ChatMessage, GenerationOptions};
use elbitat_core::{CampaignRequest, Goal, Platform};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::prompts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOverview {
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub duration_weeks: u32,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub key_message: String,
}

impl Default for PlanOverview {
    fn default() -> Self {
        Self {
            objective: "Build awareness".to_string(),
            duration_weeks: 8,
            target_audience: "Wellness seekers".to_string(),
            key_message: "Transform your wellness journey".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentStrategy {
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub content_pillars: Vec<String>,
}

impl Default for ContentStrategy {
    fn default() -> Self {
        Self {
            themes: vec!["Wellness".into(), "Self-care".into(), "Transformation".into()],
            tone: "inspirational".to_string(),
            content_pillars: vec!["Education".into(), "Inspiration".into(), "Community".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingSchedule {
    #[serde(default)]
    pub frequency_per_week: u32,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub best_times: String,
}

impl Default for PostingSchedule {
    fn default() -> Self {
        Self {
            frequency_per_week: 2,
            platforms: vec!["Instagram".into(), "Facebook".into()],
            best_times: "Morning (9-11am)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedPost {
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub post_number: Option<u32>,
    #[serde(default)]
    pub focus_service: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub suggested_content: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// Multi-week campaign plan produced by the strategist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingPlan {
    #[serde(default = "default_campaign_name")]
    pub campaign_name: String,
    #[serde(default)]
    pub overview: PlanOverview,
    #[serde(default)]
    pub content_strategy: ContentStrategy,
    #[serde(default)]
    pub posting_schedule: PostingSchedule,
    #[serde(default)]
    pub posts: Vec<PlannedPost>,
    /// Unparsed reply kept when the model did not return JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_plan: Option<String>,
}

fn default_campaign_name() -> String {
    "Marketing Campaign".to_string()
}

impl MarketingPlan {
    /// Plan used when the reply cannot be parsed
    pub fn fallback(raw_plan: impl Into<String>) -> Self {
        Self {
            campaign_name: default_campaign_name(),
            overview: PlanOverview {
                objective: "Generated from conversation".to_string(),
                key_message: "Holistic wellness".to_string(),
                ..PlanOverview::default()
            },
            content_strategy: ContentStrategy::default(),
            posting_schedule: PostingSchedule::default(),
            posts: Vec::new(),
            raw_plan: Some(raw_plan.into()),
        }
    }
}

pub struct MarketingStrategist {
    ai: AIService,
}

impl MarketingStrategist {
    pub fn new(ai: AIService) -> Self {
        Self { ai }
    }

    /// One conversational turn. Errors become an apology so the conversation can continue.
    pub async fn chat(&self, user_message: &str, history: &[ChatMessage]) -> String {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(prompts::STRATEGIST_CHAT_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(user_message));

        let options = GenerationOptions {
            temperature: 0.8,
            max_tokens: 500,
            json_mode: false,
        };
        match self.ai.chat(&messages, options).await {
            Ok(response) => response.data,
            Err(e) => {
                warn!("Strategist chat failed: {}", e);
                format!(
                    "I apologize, but I encountered an error: {}. Please try again.",
                    e
                )
            }
        }
    }

    /// Ask for a structured plan. AI failures propagate; unparseable replies yield a fallback plan.
    pub async fn generate_marketing_plan(&self, history: &[ChatMessage]) -> Result<MarketingPlan> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(prompts::STRATEGIST_PLAN_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(prompts::PLAN_REQUEST_MESSAGE));

        let response = self.ai.chat(&messages, GenerationOptions::default()).await?;
        info!("Marketing plan generated: {} characters", response.data.len());

        let text = strip_code_fences(&response.data);
        match serde_json::from_str::<MarketingPlan>(text) {
            Ok(plan) => Ok(plan),
            Err(e) => {
                warn!("Plan reply was not valid JSON, keeping raw text: {}", e);
                Ok(MarketingPlan::fallback(text))
            }
        }
    }
}

fn parse_platforms(names: &[String]) -> Vec<Platform> {
    let mut platforms = Vec::new();
    for name in names {
        if let Ok(p) = name.parse::<Platform>() {
            if !platforms.contains(&p) {
                platforms.push(p);
            }
        }
    }
    platforms
}

/// One request per planned post, spaced `7 / frequency_per_week` days apart
pub fn convert_plan_to_requests(plan: &MarketingPlan, start: NaiveDate) -> Vec<CampaignRequest> {
    let frequency = plan.posting_schedule.frequency_per_week;
    let days_between = if frequency > 0 { 7 / frequency } else { 7 };
    let total = plan.posts.len();
    let overview = &plan.overview;

    let default_platforms = {
        let parsed = parse_platforms(&plan.posting_schedule.platforms);
        if parsed.is_empty() {
            vec![Platform::Instagram, Platform::Facebook]
        } else {
            parsed
        }
    };

    plan.posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let number = i + 1;
            let post_date = start + Duration::days(i64::from(days_between) * i as i64);

            let goal_text = post.goal.as_deref().unwrap_or("Engagement");
            let goal = goal_text
                .parse::<Goal>()
                .or_else(|_| overview.objective.parse::<Goal>())
                .unwrap_or(Goal::Engagement);

            let platforms = {
                let parsed = parse_platforms(&post.platforms);
                if parsed.is_empty() {
                    default_platforms.clone()
                } else {
                    parsed
                }
            };

            let week = post
                .week
                .unwrap_or_else(|| (i as u32) / frequency.max(1) + 1);
            let theme = post.theme.as_deref().unwrap_or("General");
            let focus = post.focus_service.as_deref().unwrap_or("Wellness");
            let content = post
                .suggested_content
                .as_deref()
                .unwrap_or("Create engaging content highlighting our wellness services.");

            let brief = format!(
                "Marketing Campaign: {campaign}\n\n\
                 Week {week} - Post {number}/{total}\n\n\
                 Theme: {theme}\n\
                 Focus: {focus}\n\
                 Goal: {goal_text}\n\n\
                 Content Direction:\n{content}\n\n\
                 Campaign Context:\n\
                 - Objective: {objective}\n\
                 - Target Audience: {audience}\n\
                 - Key Message: {message}\n\
                 - Tone: {tone}\n\n\
                 Scheduled for: {date}",
                campaign = plan.campaign_name,
                objective = overview.objective,
                audience = overview.target_audience,
                message = overview.key_message,
                tone = plan.content_strategy.tone,
                date = post_date.format("%B %d, %Y"),
            );

            CampaignRequest {
                title: format!("{} - Post {}", plan.campaign_name, number),
                month: Some(post_date.format("%Y-%m").to_string()),
                goal,
                platforms,
                audience: Some(overview.target_audience.clone()).filter(|a| !a.is_empty()),
                language: "en".to_string(),
                brief,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plan_with_posts(frequency: u32, posts: usize) -> MarketingPlan {
        MarketingPlan {
            campaign_name: "Autumn Wellness".to_string(),
            overview: PlanOverview::default(),
            content_strategy: ContentStrategy::default(),
            posting_schedule: PostingSchedule {
                frequency_per_week: frequency,
                platforms: vec!["Instagram".into(), "TikTok".into()],
                best_times: String::new(),
            },
            posts: (0..posts)
                .map(|i| PlannedPost {
                    week: Some(1),
                    goal: Some(if i == 0 { "Bookings" } else { "nonsense" }.to_string()),
                    theme: Some("Yoga".to_string()),
                    ..Default::default()
                })
                .collect(),
            raw_plan: None,
        }
    }

    #[test]
    fn test_posts_are_spaced_by_frequency() {
        let plan = plan_with_posts(2, 3);
        let start = NaiveDate::from_ymd_opt(2025, 9, 29).unwrap();

        let requests = convert_plan_to_requests(&plan, start);

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].title, "Autumn Wellness - Post 1");
        assert_eq!(requests[0].month.as_deref(), Some("2025-09"));
        // 7 / 2 = 3 days apart
        assert_eq!(requests[2].month.as_deref(), Some("2025-10"));
        assert!(requests[2].brief.contains("Scheduled for: October 05, 2025"));
        assert_eq!(requests[0].platforms, vec![Platform::Instagram, Platform::TikTok]);
    }

    #[test]
    fn test_goal_parsing_falls_back() {
        let plan = plan_with_posts(0, 2);
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let requests = convert_plan_to_requests(&plan, start);

        assert_eq!(requests[0].goal, Goal::Bookings);
        // "nonsense" and the overview objective "Build awareness" do not parse
        assert_eq!(requests[1].goal, Goal::Engagement);
        assert!(requests[1].brief.contains("Scheduled for: January 08, 2025"));
    }

    #[test]
    fn test_plan_deserializes_with_missing_sections() {
        let plan: MarketingPlan =
            serde_json::from_str(r#"{"campaign_name": "Spring", "posts": [{"week": 2}]}"#).unwrap();
        assert_eq!(plan.campaign_name, "Spring");
        assert_eq!(plan.posting_schedule.frequency_per_week, 2);
        assert_eq!(plan.posts[0].week, Some(2));
        assert!(plan.raw_plan.is_none());
    }
}
