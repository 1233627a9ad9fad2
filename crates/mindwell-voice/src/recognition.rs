//! Speech-to-text.
//!
//! Recognition never raises: every failure (bad audio, unreachable service,
//! empty result) becomes [`TranscriptionOutcome::Failed`], and callers must
//! not forward a failed outcome to the chat model.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use mindwell_core::config::VoiceConfig;

use crate::audio::{AudioClip, AudioFormat};

/// Prefix shown to the user when recognition fails.
pub const FAILURE_PREFIX: &str = "Could not recognize audio";

/// Result of one recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionOutcome {
    Recognized(String),
    Failed(String),
}

impl TranscriptionOutcome {
    /// Recognized text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            TranscriptionOutcome::Recognized(text) => Some(text),
            TranscriptionOutcome::Failed(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, TranscriptionOutcome::Recognized(_))
    }
}

impl std::fmt::Display for TranscriptionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptionOutcome::Recognized(text) => write!(f, "{}", text),
            TranscriptionOutcome::Failed(reason) => write!(f, "{}: {}", FAILURE_PREFIX, reason),
        }
    }
}

/// Service that turns a recorded clip into text.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe `clip` spoken in `locale` (e.g. "hi-IN").
    async fn transcribe(&self, clip: &AudioClip, locale: &str) -> TranscriptionOutcome;
}

// ---------------------------------------------------------------------------
// GoogleSpeechRecognizer
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

/// Client for the Google Cloud Speech-to-text `speech:recognize` REST call.
pub struct GoogleSpeechRecognizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleSpeechRecognizer {
    pub fn new(config: &VoiceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.recognition_endpoint.clone(),
            api_key: config.recognition_api_key.clone(),
        })
    }

    /// Build the JSON body for a clip, or explain why the clip is unusable.
    fn request_body(clip: &AudioClip, locale: &str) -> Result<serde_json::Value, String> {
        if clip.is_empty() {
            return Err("audio file is empty".to_string());
        }
        let (config, audio) = match clip.format() {
            AudioFormat::Wav => {
                let pcm = clip.to_linear16().map_err(|e| e.to_string())?;
                let layout = pcm.wav_layout().map_err(|e| e.to_string())?;
                let config = json!({
                    "encoding": "LINEAR16",
                    "sampleRateHertz": layout.sample_rate,
                    "audioChannelCount": layout.channels,
                    "languageCode": locale,
                });
                (config, pcm)
            }
            AudioFormat::Mp3 => {
                let config = json!({
                    "encoding": "MP3",
                    "languageCode": locale,
                });
                (config, clip.clone())
            }
        };
        let content = base64::engine::general_purpose::STANDARD.encode(audio.bytes());
        Ok(json!({ "config": config, "audio": { "content": content } }))
    }

    fn join_transcripts(response: RecognizeResponse) -> String {
        response
            .results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn transcribe(&self, clip: &AudioClip, locale: &str) -> TranscriptionOutcome {
        if self.api_key.is_empty() {
            return TranscriptionOutcome::Failed(
                "speech recognition API key is not configured".to_string(),
            );
        }
        let body = match Self::request_body(clip, locale) {
            Ok(body) => body,
            Err(reason) => return TranscriptionOutcome::Failed(reason),
        };

        let resp = match self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "Speech recognition request failed");
                return TranscriptionOutcome::Failed(format!("request failed: {}", e));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, detail = %detail, "Speech recognition rejected the clip");
            return TranscriptionOutcome::Failed(format!("speech service returned {}", status));
        }

        let parsed: RecognizeResponse = match resp.json().await {
            Ok(parsed) => parsed,
            Err(e) => return TranscriptionOutcome::Failed(format!("invalid response: {}", e)),
        };

        let text = Self::join_transcripts(parsed);
        if text.is_empty() {
            TranscriptionOutcome::Failed("no speech recognized".to_string())
        } else {
            tracing::debug!(locale, chars = text.chars().count(), "Audio transcribed");
            TranscriptionOutcome::Recognized(text)
        }
    }
}

// ---------------------------------------------------------------------------
// MockSpeechRecognizer
// ---------------------------------------------------------------------------

/// Recognizer returning a fixed outcome and recording each call's locale.
pub struct MockSpeechRecognizer {
    outcome: TranscriptionOutcome,
    locales: Mutex<Vec<String>>,
}

impl MockSpeechRecognizer {
    pub fn recognizing(text: impl Into<String>) -> Self {
        Self::with_outcome(TranscriptionOutcome::Recognized(text.into()))
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_outcome(TranscriptionOutcome::Failed(reason.into()))
    }

    pub fn with_outcome(outcome: TranscriptionOutcome) -> Self {
        Self {
            outcome,
            locales: Mutex::new(Vec::new()),
        }
    }

    /// Locales passed to every call so far.
    pub fn locales(&self) -> Vec<String> {
        self.locales.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.locales.lock().map(|l| l.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SpeechRecognizer for MockSpeechRecognizer {
    async fn transcribe(&self, _clip: &AudioClip, locale: &str) -> TranscriptionOutcome {
        if let Ok(mut l) = self.locales.lock() {
            l.push(locale.to_string());
        }
        self.outcome.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
