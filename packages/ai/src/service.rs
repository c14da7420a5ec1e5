// ABOUTME: AI service for text and structured generation calls to OpenAI
// ABOUTME: Handles chat-completion requests, code-fence stripping and JSON parsing

use elbitat_config::{constants, env_non_empty};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum AIServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid response format")]
    InvalidResponse,
}

pub type AIServiceResult<T> = Result<T, AIServiceError>;

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the API to return a JSON object
    pub json_mode: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            json_mode: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[derive(Debug)]
pub struct AIResponse<T> {
    pub data: T,
    pub usage: Usage,
}

/// Strip Markdown code fences (```json ... ```) around a model reply
pub fn strip_code_fences(text: &str) -> &str {
    let cleaned_text = text.trim();
    if !cleaned_text.starts_with("```") {
        return cleaned_text;
    }
    // Find the first newline after opening fence
    let start = cleaned_text.find('\n').map(|i| i + 1).unwrap_or(cleaned_text.len());
    let end = cleaned_text[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(cleaned_text.len());
    cleaned_text[start..end].trim()
}

/// AI service for making chat-completion calls
pub struct AIService {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl AIService {
    /// Create HTTP client with timeout configuration
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new())
    }

    /// Creates a new AI service instance from the environment.
    /// Reads OPENAI_API_KEY, OPENAI_MODEL and OPENAI_BASE_URL.
    pub fn new() -> Self {
        let api_key = env_non_empty(constants::OPENAI_API_KEY);
        if api_key.is_none() {
            info!("OPENAI_API_KEY not set - AI generation will fall back to placeholders");
        }

        let model =
            env_non_empty(constants::OPENAI_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model != DEFAULT_MODEL {
            info!("Using custom OpenAI model: {}", model);
        }

        let base_url = env_non_empty(constants::OPENAI_BASE_URL)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client: Self::create_client(),
            api_key,
            model,
            base_url,
        }
    }

    /// Creates a new AI service instance with a specific API key
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            api_key: Some(api_key),
            ..Self::new()
        }
    }

    /// Creates a service with explicit key, model and base URL
    pub fn with_config(api_key: Option<String>, model: String, base_url: String) -> Self {
        Self {
            client: Self::create_client(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the model being used by this service
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends a conversation and returns the assistant's reply
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: GenerationOptions,
    ) -> AIServiceResult<AIResponse<String>> {
        let api_key = self.api_key.as_ref().ok_or(AIServiceError::NoApiKey)?;

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        info!(
            "Making OpenAI request: model={}, messages={}, json_mode={}",
            self.model,
            messages.len(),
            options.json_mode
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("OpenAI request timed out");
                    AIServiceError::ApiError(
                        "Request timed out. The AI service may be overloaded or unavailable."
                            .to_string(),
                    )
                } else if e.is_connect() {
                    error!("Failed to connect to OpenAI API: {}", e);
                    AIServiceError::ApiError(format!(
                        "Connection failed: {}. Please check your internet connection.",
                        e
                    ))
                } else {
                    error!("OpenAI request failed: {}", e);
                    AIServiceError::RequestFailed(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI API error: {} - {}", status, error_text);
            return Err(AIServiceError::ApiError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AIServiceError::InvalidResponse)?;

        debug!(
            "OpenAI reply: {} chars, {} tokens",
            text.len(),
            completion.usage.total_tokens()
        );

        Ok(AIResponse {
            data: text,
            usage: completion.usage,
        })
    }

    /// Conversation call whose reply is parsed as JSON
    pub async fn chat_structured<T: for<'de> Deserialize<'de>>(
        &self,
        messages: &[ChatMessage],
    ) -> AIServiceResult<AIResponse<T>> {
        let options = GenerationOptions {
            json_mode: true,
            ..GenerationOptions::default()
        };
        let response = self.chat(messages, options).await?;
        let json_text = strip_code_fences(&response.data);

        let data: T = serde_json::from_str(json_text).map_err(|e| {
            error!(
                "JSON parsing failed: {}. JSON snippet: {}",
                e,
                json_text.chars().take(500).collect::<String>()
            );
            AIServiceError::ParseError(format!("Failed to parse JSON: {}", e))
        })?;

        Ok(AIResponse {
            data,
            usage: response.usage,
        })
    }

    /// Makes a text generation call
    pub async fn generate_text(
        &self,
        prompt: String,
        system_prompt: Option<String>,
    ) -> AIServiceResult<AIResponse<String>> {
        self.generate_text_with_options(prompt, system_prompt, GenerationOptions::default())
            .await
    }

    pub async fn generate_text_with_options(
        &self,
        prompt: String,
        system_prompt: Option<String>,
        options: GenerationOptions,
    ) -> AIServiceResult<AIResponse<String>> {
        let messages = Self::build_messages(prompt, system_prompt);
        self.chat(&messages, options).await
    }

    /// Makes a structured generation call.
    /// The prompt should request JSON output and the response will be parsed.
    pub async fn generate_structured<T: for<'de> Deserialize<'de>>(
        &self,
        prompt: String,
        system_prompt: Option<String>,
    ) -> AIServiceResult<AIResponse<T>> {
        let messages = Self::build_messages(prompt, system_prompt);
        self.chat_structured(&messages).await
    }

    fn build_messages(prompt: String, system_prompt: Option<String>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));
        messages
    }
}

impl Default for AIService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fences("  plain text "), "plain text");
    }

    #[test]
    fn test_usage_total() {
        let usage = Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
        };
        assert_eq!(usage.total_tokens(), 15);
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let service = AIService::with_config(
            None,
            "gpt-4o-mini".to_string(),
            "http://127.0.0.1:9".to_string(),
        );
        let result = service.generate_text("hi".to_string(), None).await;
        assert!(matches!(result, Err(AIServiceError::NoApiKey)));
    }
}
