//! Conversation engine for MindWell.
//!
//! Provides prompt composition, per-session conversation state, the chat
//! provider abstraction with an Ollama client, and the orchestrator that
//! ties them together for each user action.

pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod session;

pub use error::ChatError;
pub use orchestrator::ChatOrchestrator;
pub use prompt::{ChatRequest, ReplyRequest};
pub use provider::{ChatProvider, MockChatProvider, OllamaChatProvider};
pub use session::{Session, SessionHandle, SessionLease, SessionStore};
