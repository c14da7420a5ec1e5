// ABOUTME: AI prompts for ad copy generation and campaign planning
// ABOUTME: Copy prompts request a fixed JSON shape for the requested platforms only

use elbitat_core::{CampaignRequest, Platform};

/// System prompt for copy generation
pub const COPY_SYSTEM_PROMPT: &str = r#"You are a senior social media copywriter for Elbitat, a boutique wellness hotel on the island of Elba, Italy.

Your role is to:
- Write warm, evocative copy that makes people want to visit
- Match each platform's conventions (Instagram captions with hashtags, Facebook posts, short TikTok captions with a video script)
- Stay truthful to the brief; never invent prices or offers

Always respond in valid JSON format matching the requested structure."#;

/// System prompt for the conversational strategist
pub const STRATEGIST_CHAT_PROMPT: &str = r#"You are a friendly and expert marketing strategist specializing in wellness, hospitality, and holistic health.

Your role is to have a conversation with clients to understand their marketing needs. Ask clarifying questions about:

1. Campaign Goals: What do they want to achieve? (awareness, bookings, engagement)
2. Target Audience: Who are they trying to reach?
3. Services/Products: What are they promoting? (yoga, massage, retreats, etc.)
4. Timeline: When should the campaign run? How long?
5. Budget/Frequency: How often can they post?
6. Brand Voice: Professional, casual, inspirational?
7. Platforms: Where should they post? (Instagram, Facebook, TikTok)

Be conversational, ask one or two questions at a time, and build understanding gradually. When you have enough information, summarize what you've learned and ask if they're ready to see a detailed marketing plan."#;

/// System prompt for plan generation
pub const STRATEGIST_PLAN_PROMPT: &str = r#"You are an expert marketing strategist specializing in wellness, hospitality, and holistic health campaigns.

Create a comprehensive marketing plan based on the conversation. Output the plan in this JSON structure:
{
  "campaign_name": "Name of the campaign",
  "overview": {
    "objective": "Primary goal",
    "duration_weeks": 8,
    "target_audience": "Description",
    "key_message": "Main message"
  },
  "content_strategy": {
    "themes": ["theme1", "theme2", "theme3"],
    "tone": "professional/casual/inspirational",
    "content_pillars": ["pillar1", "pillar2"]
  },
  "posting_schedule": {
    "frequency_per_week": 2,
    "platforms": ["Instagram", "Facebook"],
    "best_times": "Morning (9-11am)"
  },
  "posts": [
    {
      "week": 1,
      "post_number": 1,
      "focus_service": "Yoga Classes",
      "theme": "Introduction to Wellness",
      "goal": "Awareness",
      "suggested_content": "Brief description of what this post should cover",
      "platforms": ["Instagram", "Facebook"]
    }
  ]
}

Be specific, actionable, and data-driven in your recommendations."#;

/// Final user turn that asks for the plan
pub const PLAN_REQUEST_MESSAGE: &str = "Based on our conversation, please create a comprehensive marketing plan in the JSON format specified. Include specific posts with week numbers, themes, and services to highlight.";

fn platform_shape(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => {
            r##"  "instagram": { "caption": "Caption text (max 2200 characters)", "hashtags": "#Tag1 #Tag2 ..." }"##
        }
        Platform::Facebook => r#"  "facebook": { "message": "Post text" }"#,
        Platform::TikTok => {
            r#"  "tiktok": { "caption": "Short caption (max 150 characters)", "script": "Shot-by-shot video script" }"#
        }
    }
}

/// Copy generation prompt for one campaign request
pub fn copy_generation_prompt(request: &CampaignRequest) -> String {
    let shape = request
        .platforms
        .iter()
        .map(|p| platform_shape(*p))
        .collect::<Vec<_>>()
        .join(",\n");

    let platform_names = request
        .platforms
        .iter()
        .map(|p| p.display_name())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Write social media copy for this campaign.

Title: {}
Goal: {}
Target month: {}
Audience: {}
Language: write all copy in language code "{}"

Brief:
{}

Write copy for these platforms only: {}.

Respond with a JSON object in exactly this shape:

{{
{}
}}"#,
        request.title,
        request.goal,
        request.month.as_deref().unwrap_or("not specified"),
        request.audience.as_deref().unwrap_or("general travellers"),
        request.language,
        request.brief,
        platform_names,
        shape
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_prompt_mentions_only_requested_platforms() {
        let request = CampaignRequest::new(
            "Autumn Yoga",
            "Morning yoga on the terrace",
            vec![Platform::Facebook, Platform::TikTok],
        );
        let prompt = copy_generation_prompt(&request);

        assert!(prompt.contains("\"facebook\""));
        assert!(prompt.contains("\"tiktok\""));
        assert!(!prompt.contains("\"instagram\""));
        assert!(prompt.contains("Morning yoga on the terrace"));
        assert!(prompt.contains("language code \"en\""));
        assert!(!prompt.contains("\"hashtags\""));
    }

    #[test]
    fn test_copy_prompt_asks_for_instagram_hashtags() {
        let request = CampaignRequest::new(
            "Summer Special",
            "Sea view rooms with breakfast",
            vec![Platform::Instagram],
        );
        let prompt = copy_generation_prompt(&request);

        assert!(prompt.contains("\"instagram\""));
        assert!(prompt.contains("\"hashtags\": \"#Tag1 #Tag2 ...\""));
        assert!(!prompt.contains("\"facebook\""));
    }
}
