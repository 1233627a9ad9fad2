//! Chat orchestrator: one entry point per user action.
//!
//! Validates input, composes the prompt, calls the provider and commits the
//! result to the session. Instruction-style requests (affirmation,
//! meditation, translation) never touch the transcript.

use std::sync::Arc;

use mindwell_core::types::ChatTurn;

use crate::error::ChatError;
use crate::prompt::{
    build_affirmation_request, build_meditation_request, build_reply_request,
    build_translation_request, ChatRequest,
};
use crate::provider::ChatProvider;
use crate::session::Session;

/// Coordinates prompt composition and provider calls.
pub struct ChatOrchestrator {
    provider: Arc<dyn ChatProvider>,
    max_message_chars: usize,
}

impl ChatOrchestrator {
    pub fn new(provider: Arc<dyn ChatProvider>, max_message_chars: usize) -> Self {
        Self {
            provider,
            max_message_chars,
        }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Free-form reply in the session's selected language.
    ///
    /// The framed user turn and the reply are appended together once the
    /// provider answers; on failure the transcript is left as it was.
    pub async fn reply(&self, session: &mut Session, user_text: &str) -> Result<String, ChatError> {
        self.validate(user_text)?;

        let reply = build_reply_request(session.history(), user_text, session.selected_language());
        tracing::info!(
            session = %session.id(),
            language = %session.selected_language(),
            turns = reply.request.len(),
            "Requesting reply"
        );

        let answer = self.provider.chat(&reply.request).await?;

        session.append(reply.user_turn);
        session.append(ChatTurn::assistant(answer.clone()));
        Ok(answer)
    }

    /// One-shot positive affirmation. Not added to the transcript.
    pub async fn affirmation(&self, language: &str) -> Result<String, ChatError> {
        self.instruct("affirmation", build_affirmation_request(language))
            .await
    }

    /// One-shot guided meditation script. Not added to the transcript.
    pub async fn meditation(&self, language: &str) -> Result<String, ChatError> {
        self.instruct("meditation", build_meditation_request(language))
            .await
    }

    /// Translate arbitrary text into any language the model can name.
    ///
    /// The target is not limited to the picker's languages; only a blank
    /// target is refused.
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String, ChatError> {
        self.validate(text)?;
        let target_language = target_language.trim();
        if target_language.is_empty() {
            return Err(ChatError::UnsupportedLanguage(String::new()));
        }
        self.instruct("translation", build_translation_request(text, target_language))
            .await
    }

    // -- Private helpers --

    fn validate(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.max_message_chars {
            return Err(ChatError::MessageTooLong(self.max_message_chars));
        }
        Ok(())
    }

    async fn instruct(&self, kind: &'static str, request: ChatRequest) -> Result<String, ChatError> {
        tracing::info!(kind, "Requesting one-shot instruction");
        let answer = self.provider.chat(&request).await?;
        tracing::debug!(kind, chars = answer.chars().count(), "Instruction answered");
        Ok(answer)
    }
}

// =============================================================================
// Tests
// =============================================================================
