// ABOUTME: Deterministic fallback copy used when generation is unavailable or unusable
// ABOUTME: Text fields carry the request title verbatim, hashtags carry it in CamelCase

use elbitat_core::{
    CampaignRequest, CopyFields, FacebookCopy, InstagramCopy, Platform, PlatformCopy, TikTokCopy,
};

/// "summer special offer" -> "SummerSpecialOffer"
pub fn title_camel_case(title: &str) -> String {
    let camel: String = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();

    if camel.is_empty() {
        "Campaign".to_string()
    } else {
        camel
    }
}

pub fn instagram_caption(request: &CampaignRequest) -> String {
    format!(
        "[PLACEHOLDER IG] {} - goal: {}\n\n{}",
        request.title, request.goal, request.brief
    )
}

pub fn instagram_hashtags(request: &CampaignRequest) -> String {
    format!("#Elbitat #ElbaIsland #{}", title_camel_case(&request.title))
}

pub fn facebook_message(request: &CampaignRequest) -> String {
    format!(
        "[PLACEHOLDER FB] {} - goal: {}\n\n{}",
        request.title, request.goal, request.brief
    )
}

pub fn tiktok_caption(request: &CampaignRequest) -> String {
    format!("[PLACEHOLDER TikTok] {}", request.title)
}

pub fn tiktok_script(request: &CampaignRequest) -> String {
    format!(
        "Intro shot of Elbitat, then overlay text with the key message: {}. {}",
        request.title, request.brief
    )
}

pub fn placeholder_fields(request: &CampaignRequest, platform: Platform) -> CopyFields {
    match platform {
        Platform::Instagram => CopyFields::Instagram(InstagramCopy {
            caption: instagram_caption(request),
            hashtags: instagram_hashtags(request),
        }),
        Platform::Facebook => CopyFields::Facebook(FacebookCopy {
            message: facebook_message(request),
        }),
        Platform::TikTok => CopyFields::TikTok(TikTokCopy {
            caption: tiktok_caption(request),
            script: tiktok_script(request),
        }),
    }
}

/// Placeholder copy for exactly the request's platforms
pub fn placeholder_copy(request: &CampaignRequest) -> PlatformCopy {
    let mut copy = PlatformCopy::default();
    for platform in &request.platforms {
        copy.insert(placeholder_fields(request, *platform));
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_camel_case() {
        assert_eq!(title_camel_case("Summer Special"), "SummerSpecial");
        assert_eq!(title_camel_case("yoga & wellness week"), "YogaWellnessWeek");
        assert_eq!(title_camel_case("!!"), "Campaign");
    }

    #[test]
    fn test_placeholder_copy_covers_requested_platforms_only() {
        let request = CampaignRequest::new(
            "Summer Special",
            "Relaxing sunset views and spa",
            vec![Platform::TikTok],
        );
        let copy = placeholder_copy(&request);

        assert_eq!(copy.platforms(), vec![Platform::TikTok]);
        let tiktok = copy.tiktok.unwrap();
        assert_eq!(tiktok.caption, "[PLACEHOLDER TikTok] Summer Special");
        assert!(tiktok.script.contains("key message: Summer Special."));
    }

    #[test]
    fn test_instagram_placeholder_text() {
        let request = CampaignRequest::new("Summer Special", "Spa days", vec![Platform::Instagram]);
        assert_eq!(
            instagram_caption(&request),
            "[PLACEHOLDER IG] Summer Special - goal: awareness\n\nSpa days"
        );
        assert_eq!(
            instagram_hashtags(&request),
            "#Elbitat #ElbaIsland #SummerSpecial"
        );
    }

    #[test]
    fn test_text_fields_carry_title_verbatim() {
        let request = CampaignRequest::new(
            "Yoga & Wellness Week",
            "Morning flows on the terrace",
            vec![Platform::Instagram, Platform::Facebook, Platform::TikTok],
        );

        for text in [
            instagram_caption(&request),
            facebook_message(&request),
            tiktok_caption(&request),
            tiktok_script(&request),
        ] {
            assert!(text.contains("Yoga & Wellness Week"), "missing title in {:?}", text);
        }
        assert_eq!(
            instagram_hashtags(&request),
            "#Elbitat #ElbaIsland #YogaWellnessWeek"
        );
    }
}
