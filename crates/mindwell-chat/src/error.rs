//! Error types for the conversation engine.

use mindwell_core::error::MindError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("chat provider error: {0}")]
    Provider(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<MindError> for ChatError {
    fn from(err: MindError) -> Self {
        match err {
            MindError::Provider(msg) => ChatError::Provider(msg),
            other => ChatError::Internal(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Provider(err.to_string())
    }
}
