//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of a single generative-service call.
///
/// `RateLimitExceeded` describes one rate-limited attempt. The retry loop
/// recovers from it locally and only ever surfaces `RetriesExhausted`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    #[error("Generative service rate limit exceeded")]
    RateLimitExceeded,

    #[error("Generative service still rate limited after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Generative service request failed with status {status}")]
    Request { status: u16 },

    #[error("Generative service response could not be parsed: {message}")]
    ResponseParse { message: String },

    #[error("Generative service transport failure: {message}")]
    Transport { message: String },
}

impl ApiError {
    /// Build a parse failure from anything displayable.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ResponseParse { message: message.into() }
    }

    /// Build a transport failure from anything displayable.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        if status == crate::constants::RATE_LIMIT_STATUS {
            Self::RateLimitExceeded
        } else {
            Self::Request { status }
        }
    }

    /// Only rate-limited attempts are worth repeating.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded)
    }
}

/// Outcome of a failed save attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The store rejected the write; no generation was attempted.
    #[error("Failed to save entry: {0}")]
    Persistence(String),

    /// The entry is saved but no reflective prompts could be produced.
    #[error("Entry saved, but prompts could not be generated: {0}")]
    Api(#[from] ApiError),

    /// Another save is still pending on this workflow.
    #[error("A save is already in progress")]
    SaveInProgress,

    /// No identity has been resolved yet.
    #[error("Not signed in")]
    NotSignedIn,
}

/// Main error type for the journaling client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum JournalError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Generation error: {0}")]
    Api(ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ApiError> for JournalError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<WorkflowError> for JournalError {
    fn from(value: WorkflowError) -> Self {
        match value {
            WorkflowError::Persistence(message) => Self::Persistence(message),
            WorkflowError::Api(err) => Self::Api(err),
            WorkflowError::SaveInProgress => Self::InvalidInput(value.to_string()),
            WorkflowError::NotSignedIn => Self::Authentication(value.to_string()),
        }
    }
}

/// Result type alias for journaling operations
pub type Result<T> = std::result::Result<T, JournalError>;
