// ABOUTME: Draft assembler that turns a campaign request into per-platform copy
// ABOUTME: Tries structured JSON first, then heuristic extraction, then placeholders

use std::sync::Arc;

use elbitat_ai::strip_code_fences;
use elbitat_core::{CampaignRequest, Platform, PlatformCopy};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::extractor::{ExtractionOutcome, TextExtractor};
use crate::generator::CopyGenerator;
use crate::placeholder;

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum HashtagValue {
    #[default]
    Missing,
    Text(String),
    List(Vec<String>),
}

impl HashtagValue {
    fn joined(&self) -> Option<String> {
        match self {
            HashtagValue::Missing => None,
            HashtagValue::Text(text) => Some(text.clone()),
            HashtagValue::List(tags) => Some(
                tags.iter()
                    .map(|t| {
                        let t = t.trim();
                        if t.starts_with('#') {
                            t.to_string()
                        } else {
                            format!("#{}", t)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StructuredFields {
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    hashtags: HashtagValue,
    #[serde(default, alias = "text", alias = "post")]
    message: Option<String>,
    #[serde(default)]
    script: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StructuredCopy {
    #[serde(default, alias = "Instagram")]
    instagram: Option<StructuredFields>,
    #[serde(default, alias = "Facebook")]
    facebook: Option<StructuredFields>,
    #[serde(default, alias = "TikTok", alias = "tik_tok")]
    tiktok: Option<StructuredFields>,
}

impl StructuredCopy {
    fn for_platform(&self, platform: Platform) -> Option<&StructuredFields> {
        match platform {
            Platform::Instagram => self.instagram.as_ref(),
            Platform::Facebook => self.facebook.as_ref(),
            Platform::TikTok => self.tiktok.as_ref(),
        }
    }

    fn is_empty(&self) -> bool {
        self.instagram.is_none() && self.facebook.is_none() && self.tiktok.is_none()
    }
}

/// Builds the copy map for a request. Never fails: every problem degrades to placeholders.
pub struct DraftAssembler {
    generator: Option<Arc<dyn CopyGenerator>>,
    extractor: TextExtractor,
}

impl DraftAssembler {
    pub fn new(generator: Option<Arc<dyn CopyGenerator>>) -> Self {
        Self {
            generator,
            extractor: TextExtractor::default(),
        }
    }

    /// Assembler that always produces placeholder copy
    pub fn placeholder_only() -> Self {
        Self::new(None)
    }

    pub fn with_extractor(mut self, extractor: TextExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Copy keyed by exactly the request's platforms
    pub async fn assemble_copy(&self, request: &CampaignRequest) -> PlatformCopy {
        let Some(generator) = &self.generator else {
            debug!("No copy generator configured, using placeholders for '{}'", request.title);
            return placeholder::placeholder_copy(request);
        };

        match generator.generate_copy(request).await {
            Ok(text) => self.copy_from_text(&text, request),
            Err(e) => {
                warn!(
                    "Copy generation failed for '{}', using placeholders: {}",
                    request.title, e
                );
                placeholder::placeholder_copy(request)
            }
        }
    }

    /// Turn generated text into copy, preferring the JSON shape the prompt asks for
    pub fn copy_from_text(&self, text: &str, request: &CampaignRequest) -> PlatformCopy {
        let structured = serde_json::from_str::<StructuredCopy>(strip_code_fences(text))
            .ok()
            .filter(|s| !s.is_empty());

        let mut copy = PlatformCopy::default();
        for platform in &request.platforms {
            let extraction = match &structured {
                Some(parsed) => {
                    let fields = parsed.for_platform(*platform);
                    let primary = fields.and_then(|f| match platform {
                        Platform::Facebook => f.message.clone().or_else(|| f.caption.clone()),
                        _ => f.caption.clone().or_else(|| f.message.clone()),
                    });
                    let secondary = fields.and_then(|f| match platform {
                        Platform::Instagram => f.hashtags.joined(),
                        Platform::TikTok => f.script.clone(),
                        Platform::Facebook => None,
                    });
                    self.extractor.complete_fields(
                        *platform,
                        primary.as_deref(),
                        secondary.as_deref(),
                        request,
                    )
                }
                None => self.extractor.extract(text, *platform, request),
            };

            if extraction.outcome != ExtractionOutcome::Complete {
                info!(
                    "{} copy for '{}' extraction was {}, placeholders filled the gaps",
                    platform.display_name(),
                    request.title,
                    extraction.outcome
                );
            }
            copy.insert(extraction.fields);
        }
        copy
    }
}
