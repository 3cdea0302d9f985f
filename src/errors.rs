use thiserror::Error;

#[derive(Debug, Error)]
pub enum GptError {
    #[error("Invalid client configuration: {0}")]
    ConfigError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to access conversation storage: {0}")]
    StorageError(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Failed to parse conversation history: {0}")]
    HistoryParseError(String),

    #[error("Invalid conversation id: {0}")]
    InvalidConversationId(String),

    #[error("Failed to serialize request: {0}")]
    SerializationError(String),
}

impl From<reqwest::Error> for GptError {
    fn from(error: reqwest::Error) -> Self {
        GptError::HttpError(error.to_string())
    }
}

impl From<std::io::Error> for GptError {
    fn from(error: std::io::Error) -> Self {
        GptError::StorageError(error.to_string())
    }
}

impl From<serde_json::Error> for GptError {
    fn from(error: serde_json::Error) -> Self {
        GptError::SerializationError(error.to_string())
    }
}

#[cfg(feature = "cli")]
impl From<anyhow::Error> for GptError {
    fn from(error: anyhow::Error) -> Self {
        GptError::ConfigError(error.to_string())
    }
}
