//! Router setup with all routes and middleware.
//!
//! Configures the axum Router with tracing, compression and body limits.
//! The audio upload route exists only in the voice variant.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Body limit for form posts and JSON requests.
const FORM_BODY_LIMIT: usize = 64 * 1024;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route("/language", post(handlers::set_language))
        .route("/message", post(handlers::message))
        .route("/affirmation", post(handlers::affirmation))
        .route("/meditation", post(handlers::meditation))
        .route("/session/end", post(handlers::end_session))
        .route("/health", get(handlers::health))
        .route("/languages", get(handlers::languages))
        .route("/translate", post(handlers::translate))
        .layer(DefaultBodyLimit::max(FORM_BODY_LIMIT));

    if state.voice.is_some() {
        let upload_limit = state.config.voice.max_upload_bytes;
        router = router.route(
            "/voice",
            post(handlers::voice_upload).layer(DefaultBodyLimit::max(upload_limit)),
        );
    }

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
