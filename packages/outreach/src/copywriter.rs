// ABOUTME: AI email copywriter for outreach campaigns
// ABOUTME: Asks for SUBJECT/BODY text and parses it with lenient fallbacks

use elbitat_ai::{AIService, ChatMessage, GenerationOptions};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::EmailTemplate;

const COPYWRITER_SYSTEM_PROMPT: &str =
    "You are an expert email marketing copywriter specializing in luxury wellness and hospitality.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl EmailLength {
    fn guidance(&self) -> &'static str {
        match self {
            EmailLength::Short => "Keep it concise, 2-3 short paragraphs maximum",
            EmailLength::Medium => "Use 3-4 paragraphs with moderate detail",
            EmailLength::Long => "Provide comprehensive detail in 5-6 paragraphs",
        }
    }
}

impl std::str::FromStr for EmailLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(EmailLength::Short),
            "medium" => Ok(EmailLength::Medium),
            "long" => Ok(EmailLength::Long),
            other => Err(format!("Unknown email length: {}", other)),
        }
    }
}

/// What the generated email should achieve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailBrief {
    pub campaign_goal: String,
    pub target_audience: String,
    pub key_points: Vec<String>,
    pub tone: String,
    pub length: EmailLength,
}

impl EmailBrief {
    pub fn new(campaign_goal: impl Into<String>, target_audience: impl Into<String>) -> Self {
        Self {
            campaign_goal: campaign_goal.into(),
            target_audience: target_audience.into(),
            key_points: Vec::new(),
            tone: "professional".to_string(),
            length: EmailLength::Medium,
        }
    }

    fn prompt(&self) -> String {
        let key_points = self
            .key_points
            .iter()
            .map(|p| format!("- {}", p))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a professional email marketing copywriter for Elbitat, a luxury wellness hotel on Elba Island, Italy.

Create a compelling email campaign with the following parameters:

**Campaign Goal:** {goal}
**Target Audience:** {audience}
**Tone:** {tone}
**Length:** {length}

**Key Points to Include:**
{key_points}

**Requirements:**
1. Create an attention-grabbing subject line (50-60 characters)
2. Write engaging email body in HTML format
3. Use personalization placeholders: {{{{first_name}}}}, {{{{company_name}}}}, {{{{country}}}}
4. Include a clear call-to-action
5. Maintain {tone} tone throughout
6. Make it suitable for B2B communication with travel agencies and wellness businesses

**Output Format:**
SUBJECT: [your subject line]

BODY:
[your HTML email content]

Make the email compelling and action-oriented while maintaining authenticity and professionalism."#,
            goal = self.campaign_goal,
            audience = self.target_audience,
            tone = self.tone,
            length = self.length.guidance(),
            key_points = key_points,
        )
    }
}

/// Split a model reply into subject and body.
///
/// Looks for `SUBJECT:` and `BODY:` markers first, then any `subject:` line in
/// the first five lines, and finally treats the first line as the subject.
pub fn parse_email_reply(content: &str) -> EmailTemplate {
    let content = content.trim();
    let lines: Vec<&str> = content.lines().collect();

    let mut subject = String::new();
    let mut body_lines = Vec::new();
    let mut in_body = false;
    for line in &lines {
        if let Some(rest) = line.strip_prefix("SUBJECT:") {
            subject = rest.trim().to_string();
        } else if line.starts_with("BODY:") {
            in_body = true;
        } else if in_body {
            body_lines.push(*line);
        }
    }
    let mut body = body_lines.join("\n").trim().to_string();

    if subject.is_empty() || body.is_empty() {
        for (i, line) in lines.iter().take(5).enumerate() {
            if line.to_lowercase().contains("subject") {
                if let Some((_, rest)) = line.split_once(':') {
                    subject = rest.trim().to_string();
                    body = lines[i + 1..].join("\n").trim().to_string();
                    break;
                }
            }
        }
    }

    if subject.is_empty() {
        let first = lines.first().copied().unwrap_or_default();
        subject = first.replace("SUBJECT:", "").trim().to_string();
        body = lines.iter().skip(1).copied().collect::<Vec<_>>().join("\n").trim().to_string();
    }

    EmailTemplate { subject, body }
}

/// Email used when generation fails
pub fn fallback_email(campaign_goal: &str, error: &str) -> EmailTemplate {
    EmailTemplate {
        subject: "Partnership Opportunity with Elbitat".to_string(),
        body: format!(
            "<p>Hi {{{{first_name}}}},</p>\n\n\
             <p>I'm reaching out regarding {}.</p>\n\n\
             <p>We'd love to discuss potential collaboration opportunities.</p>\n\n\
             <p>Best regards,<br>\nThe Elbitat Team</p>\n\n\
             <p><em>Note: AI generation failed, using fallback template. Error: {}</em></p>",
            campaign_goal, error
        ),
    }
}

pub struct EmailCopywriter {
    ai: AIService,
}

impl EmailCopywriter {
    pub fn new(ai: AIService) -> Self {
        Self { ai }
    }

    /// Never fails; AI errors produce the fallback email
    pub async fn generate_email_content(&self, brief: &EmailBrief) -> EmailTemplate {
        let messages = [
            ChatMessage::system(COPYWRITER_SYSTEM_PROMPT),
            ChatMessage::user(brief.prompt()),
        ];
        let options = GenerationOptions {
            temperature: 0.7,
            max_tokens: 1500,
            json_mode: false,
        };

        match self.ai.chat(&messages, options).await {
            Ok(response) => {
                info!("Generated outreach email for '{}'", brief.campaign_goal);
                parse_email_reply(&response.data)
            }
            Err(e) => {
                warn!("Error generating AI email content: {}", e);
                fallback_email(&brief.campaign_goal, &e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_subject_and_body_markers() {
        let reply = "SUBJECT: Autumn retreats for your clients\n\nBODY:\n<p>Hi {{first_name}},</p>\n<p>Join us.</p>";
        let email = parse_email_reply(reply);
        assert_eq!(email.subject, "Autumn retreats for your clients");
        assert_eq!(email.body, "<p>Hi {{first_name}},</p>\n<p>Join us.</p>");
    }

    #[test]
    fn test_parse_lowercase_subject_line() {
        let reply = "Here is your email\nSubject line: Slow down on Elba\n<p>Body text</p>";
        let email = parse_email_reply(reply);
        assert_eq!(email.subject, "Slow down on Elba");
        assert_eq!(email.body, "<p>Body text</p>");
    }

    #[test]
    fn test_parse_first_line_fallback() {
        let email = parse_email_reply("Wellness partnerships\n<p>Let's talk</p>");
        assert_eq!(email.subject, "Wellness partnerships");
        assert_eq!(email.body, "<p>Let's talk</p>");
    }

    #[test]
    fn test_fallback_email_keeps_placeholder() {
        let email = fallback_email("autumn retreats", "no key");
        assert!(email.body.starts_with("<p>Hi {{first_name}},</p>"));
        assert!(email.body.contains("regarding autumn retreats"));
        assert!(email.body.contains("Error: no key"));
    }
}
