// ABOUTME: Core types, record keys and workspace paths for the Elbitat social agent
// ABOUTME: Foundational package shared by storage, creative, publishing and the CLI

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    CampaignRequest, CopyFields, Draft, FacebookCopy, Goal, InstagramCopy, Platform,
    PlatformCopy, PostOutcome, PostStatus, PostedResult, ScheduleStatus, ScheduledPost,
    TikTokCopy,
};

// Re-export constants
pub use constants::{default_workspace_dir, resolve_workspace_dir, WORKSPACE_DIR_NAME};

// Re-export utilities
pub use utils::{draft_key, posted_key, request_key, scheduled_key, slugify};

// Re-export validation
pub use validation::{truncate, validate_request, ValidationError};
