// ABOUTME: Error types for the creative package
// ABOUTME: Covers draft lookup, confirmation, validation and upstream failures

use elbitat_ai::AIServiceError;
use elbitat_core::ValidationError;
use elbitat_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreativeError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("AI service error: {0}")]
    AIService(#[from] AIServiceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Draft not found: {0}")]
    DraftNotFound(String),

    #[error("Scheduled post not found: {0}")]
    ScheduledNotFound(String),

    #[error("Deleting '{0}' requires explicit confirmation")]
    NotConfirmed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Copy generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, CreativeError>;
