// ABOUTME: Copy generator seam between the assembler and the AI service
// ABOUTME: The OpenAI-backed implementation asks for JSON copy for the requested platforms

use async_trait::async_trait;
use elbitat_ai::{AIService, GenerationOptions};
use elbitat_core::CampaignRequest;
use tracing::info;

use crate::error::Result;
use crate::prompts;

/// Produces raw generated copy text for a request
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    async fn generate_copy(&self, request: &CampaignRequest) -> Result<String>;
}

pub struct OpenAICopyGenerator {
    service: AIService,
}

impl OpenAICopyGenerator {
    pub fn new(service: AIService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CopyGenerator for OpenAICopyGenerator {
    async fn generate_copy(&self, request: &CampaignRequest) -> Result<String> {
        info!("Generating copy for '{}' with {}", request.title, self.service.model());

        let options = GenerationOptions {
            json_mode: true,
            ..GenerationOptions::default()
        };
        let response = self
            .service
            .generate_text_with_options(
                prompts::copy_generation_prompt(request),
                Some(prompts::COPY_SYSTEM_PROMPT.to_string()),
                options,
            )
            .await?;

        Ok(response.data)
    }
}
