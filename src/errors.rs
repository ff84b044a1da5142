//! Error types for crunchdigest
//!
//! One error enum for the whole library. The session decides which
//! variants become user notifications; the binary maps the rest to exit codes.

use thiserror::Error;

/// Main error type for summarization sessions
#[derive(Error, Debug)]
pub enum SummaryError {
    /// Reference does not contain the allowed source domain
    #[error("Please enter a valid TechCrunch article (got {input:?})")]
    InvalidDomain { input: String },

    /// Navigation slug is absent or has empty segments
    #[error("Malformed article slug: {0}")]
    MalformedSlug(String),

    /// A summarization is already running in this session
    #[error("A summary is already being generated")]
    AlreadyInFlight,

    /// Summarization endpoint answered with a non-OK status
    #[error("Summarization request failed: HTTP {status}: {reason}")]
    RequestFailed { status: u16, reason: String },

    /// Summarization endpoint answered without a readable body
    #[error("Summarization response carried no body")]
    EmptyResponseBody,

    /// Streaming errors
    #[error("Streaming error: {0}")]
    StreamingError(String),

    /// State machine transition errors
    #[error("Invalid state transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

impl SummaryError {
    /// Whether the error should reach the user as a notification
    ///
    /// `EmptyResponseBody` is swallowed, everything raised by validation or
    /// the endpoint is shown.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, SummaryError::EmptyResponseBody)
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SummaryError::RequestFailed { status, .. } => Some(*status),
            SummaryError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for summarization operations
pub type Result<T> = std::result::Result<T, SummaryError>;

impl From<anyhow::Error> for SummaryError {
    fn from(err: anyhow::Error) -> Self {
        SummaryError::Generic(err.to_string())
    }
}
