use thiserror::Error;

/// Top-level error type for MindWell.
///
/// Subsystem crates define their own error types and implement
/// `From<MindError>` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MindError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<toml::de::Error> for MindError {
    fn from(err: toml::de::Error) -> Self {
        MindError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MindError {
    fn from(err: toml::ser::Error) -> Self {
        MindError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MindError {
    fn from(err: serde_json::Error) -> Self {
        MindError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for MindWell operations.
pub type Result<T> = std::result::Result<T, MindError>;
