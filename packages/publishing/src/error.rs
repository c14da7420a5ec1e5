// ABOUTME: Error types for the publishing adapters
// ABOUTME: HTTP, API and local media failures all surface as PublishError

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No media to publish: {0}")]
    NoMedia(String),

    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

pub type PublishResult<T> = Result<T, PublishError>;
