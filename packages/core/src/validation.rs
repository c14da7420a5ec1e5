// ABOUTME: Validation of campaign requests before they are stored
// ABOUTME: Also hosts display helpers shared by the CLI and logs

use thiserror::Error;

use crate::types::CampaignRequest;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    Required(&'static str),

    #[error("At least one platform is required")]
    NoPlatforms,
}

/// Checks the fields a new request must carry
pub fn validate_request(request: &CampaignRequest) -> Result<(), ValidationError> {
    if request.title.trim().is_empty() {
        return Err(ValidationError::Required("title"));
    }
    if request.brief.trim().is_empty() {
        return Err(ValidationError::Required("brief"));
    }
    if request.platforms.is_empty() {
        return Err(ValidationError::NoPlatforms);
    }
    Ok(())
}

/// Truncate to at most `max` characters, appending `...` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Platform;

    #[test]
    fn test_valid_request() {
        let request = CampaignRequest::new("Title", "Brief", vec![Platform::Instagram]);
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let request = CampaignRequest::new(" ", "Brief", vec![Platform::Instagram]);
        assert_eq!(validate_request(&request), Err(ValidationError::Required("title")));

        let request = CampaignRequest::new("Title", "", vec![Platform::Instagram]);
        assert_eq!(validate_request(&request), Err(ValidationError::Required("brief")));

        let request = CampaignRequest::new("Title", "Brief", vec![]);
        assert_eq!(validate_request(&request), Err(ValidationError::NoPlatforms));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long sentence here", 10), "a long ...");
    }
}
