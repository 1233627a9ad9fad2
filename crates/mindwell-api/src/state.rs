//! Application state shared across all route handlers.
//!
//! AppState holds the session store, the conversation engine and, in the
//! voice variant, the speech adapters. It is passed to handlers via axum's
//! State extractor.

use std::sync::Arc;
use std::time::Instant;

use mindwell_chat::{ChatOrchestrator, ChatProvider, SessionStore};
use mindwell_core::config::MindWellConfig;
use mindwell_core::UiVariant;
use mindwell_voice::{SpeechRecognizer, SpeechSynthesizer};

use crate::view::PageRenderer;

/// Speech adapters used by the voice variant.
#[derive(Clone)]
pub struct VoiceServices {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only after startup).
    pub config: Arc<MindWellConfig>,
    /// Live sessions keyed by cookie id.
    pub sessions: Arc<SessionStore>,
    /// Prompt composition and chat provider access.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Present only in the voice variant.
    pub voice: Option<VoiceServices>,
    /// Page template environment.
    pub view: Arc<PageRenderer>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// State for the text-only front end.
    pub fn text(
        mut config: MindWellConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, minijinja::Error> {
        config.ui.variant = UiVariant::Text;
        Self::build(config, provider, None)
    }

    /// State for the voice-enabled front end.
    pub fn voice(
        mut config: MindWellConfig,
        provider: Arc<dyn ChatProvider>,
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Result<Self, minijinja::Error> {
        config.ui.variant = UiVariant::Voice;
        Self::build(
            config,
            provider,
            Some(VoiceServices {
                recognizer,
                synthesizer,
            }),
        )
    }

    pub fn variant(&self) -> UiVariant {
        self.config.ui.variant
    }

    fn build(
        config: MindWellConfig,
        provider: Arc<dyn ChatProvider>,
        voice: Option<VoiceServices>,
    ) -> Result<Self, minijinja::Error> {
        let orchestrator = ChatOrchestrator::new(provider, config.chat.max_message_chars);
        Ok(Self {
            sessions: Arc::new(SessionStore::new(config.session.timeout_minutes)),
            orchestrator: Arc::new(orchestrator),
            voice,
            view: Arc::new(PageRenderer::new()?),
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }
}
