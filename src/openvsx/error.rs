use thiserror::Error;

/// Message used whenever the registry reports a missing extension or version
pub const EXTENSION_NOT_FOUND: &str = "extension not found";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Registry returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl LookupError {
    pub fn not_found() -> Self {
        LookupError::NotFound(EXTENSION_NOT_FOUND.to_string())
    }

    /// Short message suitable for the message half of an error badge
    pub fn pretty_message(&self) -> &str {
        match self {
            LookupError::Network(_) => "inaccessible",
            LookupError::Status { message, .. } => message,
            LookupError::InvalidResponse(_) => "invalid response data",
            LookupError::NotFound(message) => message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound(_))
    }
}
