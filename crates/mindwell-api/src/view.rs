//! Page rendering.
//!
//! Every form action answers with the whole page, so `PageView` carries
//! the complete screen: picker, transcript, and any one-off panels produced
//! by the action that was just handled.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use minijinja::Environment;
use serde::Serialize;

use mindwell_chat::Session;
use mindwell_core::{LanguageRegistry, UiVariant};

const PAGE_TEMPLATE: &str = "page.html";

pub const PAGE_HEADING: &str = "Mental Health Support Agent";

/// Template environment holding the single page template.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Compile the page template. Fails if the template does not parse.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("../assets/page.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &PageView) -> Result<String, minijinja::Error> {
        self.env.get_template(PAGE_TEMPLATE)?.render(view)
    }
}

#[derive(Debug, Serialize)]
pub struct LanguageOption {
    pub name: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct TranscriptLine {
    pub label: &'static str,
    pub content: String,
}

/// A labelled block shown under the transcript for one response.
#[derive(Debug, Serialize)]
pub struct Panel {
    pub label: String,
    pub content: String,
    pub audio: Option<String>,
}

impl Panel {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            audio: None,
        }
    }

    pub fn with_audio(mut self, mp3: &[u8]) -> Self {
        self.audio = Some(audio_data_uri(mp3));
        self
    }
}

/// Everything the page template needs.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page_title: String,
    pub title: &'static str,
    pub voice: bool,
    pub languages: Vec<LanguageOption>,
    pub selected_language: String,
    pub input_label: String,
    pub transcript: Vec<TranscriptLine>,
    pub panels: Vec<Panel>,
    /// Spoken form of the latest assistant reply.
    pub reply_audio: Option<String>,
}

impl PageView {
    pub fn for_session(session: &Session, page_title: &str, variant: UiVariant) -> Self {
        let selected = session.selected_language();
        let languages = LanguageRegistry::display_names()
            .map(|name| LanguageOption {
                name,
                selected: name == selected,
            })
            .collect();
        let transcript = session
            .history()
            .iter()
            .map(|turn| TranscriptLine {
                label: turn.role().label(),
                content: turn.content().to_string(),
            })
            .collect();

        Self {
            page_title: page_title.to_string(),
            title: PAGE_HEADING,
            voice: variant.is_voice(),
            languages,
            selected_language: selected.to_string(),
            input_label: format!("How can I help you today? (You can type in {})", selected),
            transcript,
            panels: Vec::new(),
            reply_audio: None,
        }
    }

    pub fn push_panel(&mut self, panel: Panel) {
        self.panels.push(panel);
    }
}

/// Embed an MP3 clip as a `data:` URI for an `<audio>` element.
pub fn audio_data_uri(mp3: &[u8]) -> String {
    format!("data:audio/mp3;base64,{}", STANDARD.encode(mp3))
}
