pub mod config;
pub mod error;
pub mod language;
pub mod types;

pub use config::MindWellConfig;
pub use error::{MindError, Result};
pub use language::{LanguageEntry, LanguageRegistry, DEFAULT_LANGUAGE};
pub use types::*;
