// ABOUTME: Error types for email outreach
// ABOUTME: Wraps HTTP, storage and AI failures plus contact validation errors

use elbitat_ai::AIServiceError;
use elbitat_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutreachError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("AI service error: {0}")]
    AIService(#[from] AIServiceError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Search API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Campaign not found: {0}")]
    CampaignNotFound(String),
}

pub type OutreachResult<T> = Result<T, OutreachError>;
