use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Non-success status. `message` is the provider's `msg`/`message` field, if any.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("Unexpected response shape: {}", .message.as_deref().unwrap_or("no tweets array"))]
    UnexpectedShape { message: Option<String> },
}

pub type Result<T> = std::result::Result<T, SearchError>;
