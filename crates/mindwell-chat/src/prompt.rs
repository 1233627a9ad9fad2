//! Prompt composition.
//!
//! Builds the message list sent to the chat provider. Language framing is
//! written into the prompt text itself; no system-role message is used.

use mindwell_core::language::LanguageRegistry;
use mindwell_core::types::{ChatTurn, ConversationHistory};

/// A message list ready for the chat provider.
///
/// A request is either the full conversation or one synthetic instruction,
/// never a mix of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRequest {
    /// Entire history followed by the new user turn.
    Conversation(Vec<ChatTurn>),
    /// A single stand-alone instruction turn.
    Instruction(ChatTurn),
}

impl ChatRequest {
    pub fn messages(&self) -> &[ChatTurn] {
        match self {
            ChatRequest::Conversation(turns) => turns,
            ChatRequest::Instruction(turn) => std::slice::from_ref(turn),
        }
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.messages().last()
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }

    pub fn is_instruction(&self) -> bool {
        matches!(self, ChatRequest::Instruction(_))
    }
}

/// Output of [`build_reply_request`].
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    /// The framed user turn, to be committed once the provider answers.
    pub user_turn: ChatTurn,
    pub request: ChatRequest,
}

/// Frame free-form user text and append it to a copy of the history.
pub fn build_reply_request(
    history: &ConversationHistory,
    user_text: &str,
    selected_language: &str,
) -> ReplyRequest {
    let entry = LanguageRegistry::resolve(selected_language);
    let content = if entry.needs_framing() {
        format!("Reply in {} language: {}", selected_language, user_text)
    } else {
        user_text.to_string()
    };
    let user_turn = ChatTurn::user(content);

    let mut turns = Vec::with_capacity(history.len() + 1);
    turns.extend(history.iter().cloned());
    turns.push(user_turn.clone());

    ReplyRequest {
        user_turn,
        request: ChatRequest::Conversation(turns),
    }
}

pub fn build_affirmation_request(selected_language: &str) -> ChatRequest {
    ChatRequest::Instruction(ChatTurn::user(format!(
        "Provide a positive affirmation in {} language to encourage someone who is feeling stressed or overwhelmed.",
        selected_language
    )))
}

pub fn build_meditation_request(selected_language: &str) -> ChatRequest {
    ChatRequest::Instruction(ChatTurn::user(format!(
        "Provide a 5-minute guided meditation script in {} language to help someone relax and reduce stress.",
        selected_language
    )))
}

pub fn build_translation_request(text: &str, target_language: &str) -> ChatRequest {
    ChatRequest::Instruction(ChatTurn::user(format!(
        "Translate this to {}: {}",
        target_language, text
    )))
}
