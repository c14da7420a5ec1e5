// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Elbitat

// Workspace & Storage
pub const ELBITAT_WORKSPACE: &str = "ELBITAT_WORKSPACE";
pub const ELBITAT_STORAGE: &str = "ELBITAT_STORAGE";
pub const ELBITAT_DATABASE_PATH: &str = "ELBITAT_DATABASE_PATH";
pub const ELBITAT_MEDIA_LIBRARY: &str = "ELBITAT_MEDIA_LIBRARY";

// Logging
pub const ELBITAT_LOG: &str = "ELBITAT_LOG";

// Meta Graph API (Instagram + Facebook)
pub const META_ACCESS_TOKEN: &str = "META_ACCESS_TOKEN";
pub const META_PAGE_ID: &str = "META_PAGE_ID";
pub const META_INSTAGRAM_ACCOUNT_ID: &str = "META_INSTAGRAM_ACCOUNT_ID";

// TikTok
pub const TIKTOK_ACCESS_TOKEN: &str = "TIKTOK_ACCESS_TOKEN";
pub const TIKTOK_OPEN_ID: &str = "TIKTOK_OPEN_ID";

// OpenAI
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

// Email outreach
pub const SENDGRID_API_KEY: &str = "SENDGRID_API_KEY";
pub const SENDGRID_FROM_EMAIL: &str = "SENDGRID_FROM_EMAIL";
pub const SERPER_API_KEY: &str = "SERPER_API_KEY";

// System Environment Variables
pub const HOME: &str = "HOME";
