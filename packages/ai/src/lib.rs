// ABOUTME: AI service integration
// ABOUTME: OpenAI chat-completions client used for copy, plans and email text

pub mod service;

// Re-export service types
pub use service::{
    strip_code_fences, AIResponse, AIService, AIServiceError, AIServiceResult, ChatMessage,
    GenerationOptions, Usage, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
