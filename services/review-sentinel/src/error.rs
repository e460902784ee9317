//! Error types for the review sentinel

/// Errors that can occur while polling and notifying
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Missing field in response: {0}")]
    MissingField(String),

    #[error("Invalid homework item: {0}")]
    InvalidItem(String),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReviewError {
    /// Startup-only errors that must abort the process instead of being
    /// handled as a cycle failure.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReviewError::Config(_) | ReviewError::Io(_) | ReviewError::Json(_)
        )
    }
}

/// Result type alias for review sentinel operations
pub type Result<T> = std::result::Result<T, ReviewError>;
