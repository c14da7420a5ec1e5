// ABOUTME: Creative pipeline turning campaign requests into reviewable drafts
// ABOUTME: Copy generation, heuristic extraction, image selection, planning and draft lifecycle

pub mod assembler;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod media;
pub mod orchestrator;
pub mod placeholder;
pub mod prompts;
pub mod strategist;

pub use assembler::DraftAssembler;
pub use error::{CreativeError, Result};
pub use extractor::{Extraction, ExtractionOutcome, TextExtractor, DEFAULT_MIN_FIELD_LEN};
pub use generator::{CopyGenerator, OpenAICopyGenerator};
pub use media::{image_count_for, ImageCategory, ImageSelector};
pub use orchestrator::DraftService;
pub use placeholder::placeholder_copy;
pub use strategist::{
    convert_plan_to_requests, ContentStrategy, MarketingPlan, MarketingStrategist, PlanOverview,
    PlannedPost, PostingSchedule,
};
