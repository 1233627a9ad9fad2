//! Route handler functions for the chat page and JSON helpers.
//!
//! Page actions are plain HTML form posts. Each one resolves the caller's
//! session from the cookie, holds the session lock for the whole action,
//! and answers with the re-rendered page.

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use mindwell_chat::{ChatError, Session, SessionLease};
use mindwell_core::{LanguageEntry, LanguageRegistry};
use mindwell_voice::{AudioClip, AudioFormat};

use crate::error::ApiError;
use crate::session_cookie;
use crate::state::AppState;
use crate::view::{audio_data_uri, PageView, Panel};

const AUDIO_FIELD: &str = "audio";

// =============================================================================
// Form and request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
    /// Picker value submitted alongside the message, if any.
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub variant: String,
    pub model: String,
    pub active_sessions: usize,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn lease_for(state: &AppState, headers: &HeaderMap) -> Result<SessionLease, ApiError> {
    Ok(state
        .sessions
        .get_or_create(session_cookie::session_id(headers))?)
}

fn page_view(state: &AppState, session: &Session) -> PageView {
    PageView::for_session(session, &state.config.ui.page_title, state.variant())
}

/// Render the page and attach the session cookie if the session is new.
fn render_page(state: &AppState, lease: &SessionLease, view: &PageView) -> Result<Response, ApiError> {
    let html = state.view.render(view)?;
    let mut response = Html(html).into_response();
    if lease.created {
        let (name, value) = session_cookie::set_cookie(lease.id);
        response.headers_mut().insert(name, value);
    }
    Ok(response)
}

fn require_supported(language: &str) -> Result<(), ApiError> {
    if LanguageRegistry::is_supported(language) {
        Ok(())
    } else {
        Err(ChatError::UnsupportedLanguage(language.to_string()).into())
    }
}

/// Speak `text` in the session's language when the voice variant is active.
async fn speak(state: &AppState, session: &Session, text: &str) -> Result<Option<Vec<u8>>, ApiError> {
    let Some(voice) = &state.voice else {
        return Ok(None);
    };
    let locale = LanguageRegistry::resolve(session.selected_language()).synthesis_locale;
    let mp3 = voice.synthesizer.synthesize(text, locale).await?;
    Ok(Some(mp3))
}

/// Shared body of the affirmation and meditation actions.
async fn canned_panel(
    state: &AppState,
    headers: &HeaderMap,
    label: &str,
    meditation: bool,
) -> Result<Response, ApiError> {
    let lease = lease_for(state, headers)?;
    let session = lease.handle.lock().await;
    let language = session.selected_language().to_string();

    let text = if meditation {
        state.orchestrator.meditation(&language).await?
    } else {
        state.orchestrator.affirmation(&language).await?
    };
    tracing::info!(session = %lease.id, kind = label, chars = text.chars().count(), "Canned response generated");

    let audio = speak(state, &session, &text).await?;
    let mut panel = Panel::new(label, text);
    if let Some(mp3) = audio {
        panel = panel.with_audio(&mp3);
    }

    let mut view = page_view(state, &session);
    view.push_panel(panel);
    render_page(state, &lease, &view)
}

// =============================================================================
// Page handlers
// =============================================================================

/// GET / - render the chat page for the caller's session.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let lease = lease_for(&state, &headers)?;
    let session = lease.handle.lock().await;
    render_page(&state, &lease, &page_view(&state, &session))
}

/// POST /language - change the selected language.
pub async fn set_language(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LanguageForm>,
) -> Result<Response, ApiError> {
    require_supported(&form.language)?;
    let lease = lease_for(&state, &headers)?;
    let mut session = lease.handle.lock().await;
    if session.set_selected_language(&form.language) {
        tracing::info!(session = %lease.id, language = %form.language, "Language changed");
    }
    render_page(&state, &lease, &page_view(&state, &session))
}

/// POST /message - free-form chat turn.
pub async fn message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<MessageForm>,
) -> Result<Response, ApiError> {
    if let Some(language) = &form.language {
        require_supported(language)?;
    }
    let lease = lease_for(&state, &headers)?;
    let mut session = lease.handle.lock().await;
    if let Some(language) = &form.language {
        session.set_selected_language(language);
    }

    if form.message.trim().is_empty() {
        return render_page(&state, &lease, &page_view(&state, &session));
    }

    tracing::info!(session = %lease.id, chars = form.message.chars().count(), "Message received");
    let reply = state.orchestrator.reply(&mut session, &form.message).await?;
    let reply_audio = speak(&state, &session, &reply).await?;

    let mut view = page_view(&state, &session);
    view.reply_audio = reply_audio.as_deref().map(audio_data_uri);
    render_page(&state, &lease, &view)
}

/// POST /affirmation - one-shot positive affirmation.
pub async fn affirmation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    canned_panel(&state, &headers, "Affirmation", false).await
}

/// POST /meditation - one-shot guided meditation.
pub async fn meditation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    canned_panel(&state, &headers, "Guided Meditation", true).await
}

/// POST /voice - transcribe an uploaded clip and answer it.
pub async fn voice_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let Some(voice) = state.voice.clone() else {
        return Err(ApiError::NotFound("voice input is not enabled".to_string()));
    };

    let mut clip = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let format = AudioFormat::from_upload(field.file_name(), field.content_type())
            .ok_or_else(|| ApiError::UnsupportedMedia("audio must be WAV or MP3".to_string()))?;
        let bytes = field.bytes().await?;
        clip = Some(AudioClip::new(bytes.to_vec(), format));
        break;
    }
    let clip = match clip {
        Some(clip) if !clip.is_empty() => clip,
        _ => return Err(ApiError::BadRequest("no audio uploaded".to_string())),
    };

    let lease = lease_for(&state, &headers)?;
    let mut session = lease.handle.lock().await;
    let language = LanguageRegistry::resolve(session.selected_language());

    tracing::info!(
        session = %lease.id,
        bytes = clip.len(),
        locale = language.recognition_locale,
        "Audio received"
    );
    let outcome = voice
        .recognizer
        .transcribe(&clip, language.recognition_locale)
        .await;

    let mut reply_audio = None;
    if let Some(text) = outcome.text() {
        let reply = state.orchestrator.reply(&mut session, text).await?;
        let mp3 = voice
            .synthesizer
            .synthesize(&reply, language.synthesis_locale)
            .await?;
        reply_audio = Some(audio_data_uri(&mp3));
    } else {
        tracing::info!(session = %lease.id, "Audio not recognized");
    }

    let mut view = page_view(&state, &session);
    view.push_panel(Panel::new("Recognized text", outcome.to_string()));
    view.reply_audio = reply_audio;
    render_page(&state, &lease, &view)
}

/// POST /session/end - forget the conversation and clear the cookie.
pub async fn end_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_cookie::session_id(&headers) {
        match state.sessions.end(id) {
            Ok(()) => tracing::info!(session = %id, "Session ended by user"),
            Err(e) => tracing::debug!(session = %id, error = %e, "Nothing to end"),
        }
    }
    ([session_cookie::clear_cookie()], Redirect::to("/")).into_response()
}

// =============================================================================
// JSON handlers
// =============================================================================

/// GET /health - liveness and basic server facts.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    state.sessions.purge_expired();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        variant: state.variant().to_string(),
        model: state.orchestrator.model().to_string(),
        active_sessions: state.sessions.len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /languages - the language registry.
pub async fn languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: LanguageRegistry::entries(),
    })
}

/// POST /translate - translate text into the requested language.
pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let translation = state
        .orchestrator
        .translate(&req.text, &req.target_language)
        .await?;
    Ok(Json(TranslateResponse { translation }))
}
