//! MindWell API crate - axum HTTP server, page rendering and route handlers.
//!
//! Serves the chat page for either front-end variant, dispatches form
//! actions to the conversation engine and speech adapters, and exposes a
//! few JSON helper endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod session_cookie;
pub mod state;
pub mod view;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, VoiceServices};
