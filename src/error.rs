// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OcrError>;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mistral API key is required. Set MISTRAL_API_KEY or pass --api-key.")]
    MissingApiKey,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("File operation failed for {}: {source}", path.display())]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("OCR API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid OCR response: {0}")]
    InvalidResponse(String),

    // cause is rendered inline, not exposed as a source
    #[error("Error processing {}: {cause}", path.display())]
    Processing { path: PathBuf, cause: Box<OcrError> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OcrError {
    /// Transport failures, rate limiting and server-side errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            OcrError::Request(_) | OcrError::Timeout(_) => true,
            OcrError::Api { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    pub fn processing(path: impl Into<PathBuf>, cause: OcrError) -> Self {
        OcrError::Processing {
            path: path.into(),
            cause: Box::new(cause),
        }
    }
}
