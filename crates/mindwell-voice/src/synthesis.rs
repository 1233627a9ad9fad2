//! Text-to-speech.
//!
//! `GoogleTranslateSynthesizer` uses the public translate TTS endpoint, which
//! only accepts short inputs, so text is split into chunks and the returned
//! MP3 frames are concatenated.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use mindwell_core::config::VoiceConfig;
use mindwell_core::error::MindError;

/// Longest chunk sent in one TTS request, in characters.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Service that turns text into an MP3 clip.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` using `locale` (e.g. "hi"). Returns MP3 bytes.
    async fn synthesize(&self, text: &str, locale: &str) -> Result<Vec<u8>, MindError>;
}

/// Characters after which a chunk may end at a clause or sentence boundary.
const BREAK_PUNCTUATION: &[char] = &['.', '!', '?', ',', ';', ':', '\u{0964}'];

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Runs of whitespace collapse to one space. Each chunk ends at the last
/// punctuation mark that fits, else at the last space that fits; a word
/// longer than `max_chars` is cut at the character limit.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let normalized: Vec<char> = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .collect();

    let mut chunks = Vec::new();
    let mut rest = normalized.as_slice();
    while !rest.is_empty() {
        if rest.len() <= max_chars {
            chunks.push(rest.iter().collect());
            break;
        }
        let cut = break_point(rest, max_chars);
        chunks.push(rest[..cut].iter().collect());
        rest = &rest[cut..];
        if rest.first() == Some(&' ') {
            rest = &rest[1..];
        }
    }
    chunks
}

/// Length of the next chunk of `rest`, which is longer than `max_chars`.
fn break_point(rest: &[char], max_chars: usize) -> usize {
    // A break at `i` keeps `rest[..i]` and drops the space at `rest[i]`.
    let mut last_space = None;
    for i in (1..=max_chars).rev().filter(|&i| rest[i] == ' ') {
        if BREAK_PUNCTUATION.contains(&rest[i - 1]) {
            return i;
        }
        last_space.get_or_insert(i);
    }
    last_space.unwrap_or(max_chars)
}

// ---------------------------------------------------------------------------
// GoogleTranslateSynthesizer
// ---------------------------------------------------------------------------

pub struct GoogleTranslateSynthesizer {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslateSynthesizer {
    pub fn new(config: &VoiceConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/translate_tts", config.tts_base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateSynthesizer {
    async fn synthesize(&self, text: &str, locale: &str) -> Result<Vec<u8>, MindError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(MindError::Synthesis("nothing to speak".to_string()));
        }

        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let resp = self
                .client
                .get(&self.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", locale),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await
                .map_err(|e| MindError::Synthesis(format!("request failed: {}", e)))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(MindError::Synthesis(format!(
                    "TTS service returned {} for chunk {}",
                    status, idx
                )));
            }
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| MindError::Synthesis(format!("failed to read audio: {}", e)))?;
            audio.extend_from_slice(&bytes);
        }

        tracing::debug!(locale, chunks = chunks.len(), bytes = audio.len(), "Speech synthesized");
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// MockSpeechSynthesizer
// ---------------------------------------------------------------------------

/// Synthesizer returning fixed bytes and recording `(text, locale)` calls.
pub struct MockSpeechSynthesizer {
    audio: Vec<u8>,
    fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSpeechSynthesizer {
    pub fn new() -> Self {
        Self {
            audio: b"ID3mock-mp3".to_vec(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for MockSpeechSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, text: &str, locale: &str) -> Result<Vec<u8>, MindError> {
        if let Ok(mut c) = self.calls.lock() {
            c.push((text.to_string(), locale.to_string()));
        }
        if self.fail {
            return Err(MindError::Synthesis("mock synthesizer failure".to_string()));
        }
        Ok(self.audio.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn synthesizer(base_url: String) -> GoogleTranslateSynthesizer {
        GoogleTranslateSynthesizer::new(&VoiceConfig {
            tts_base_url: base_url,
            request_timeout_secs: 5,
            ..VoiceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_chunk_short_text_is_single_chunk() {
        assert_eq!(chunk_text("Breathe in slowly.", 100), vec!["Breathe in slowly."]);
    }

    #[test]
    fn test_chunk_collapses_whitespace() {
        assert_eq!(chunk_text("  one \n two\tthree ", 100), vec!["one two three"]);
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text(" \n\t", 100).is_empty());
    }

    #[test]
    fn test_chunks_respect_limit_and_keep_words() {
        let text = "Close your eyes and take a slow deep breath, noticing the air as it fills your lungs and leaves again.";
        let chunks = chunk_text(text, 30);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 30, "{:?}", chunk);
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_chunk_exact_fit() {
        assert_eq!(chunk_text("abcd efgh", 9), vec!["abcd efgh"]);
        assert_eq!(chunk_text("abcd efghi", 9), vec!["abcd", "efghi"]);
    }

    #[test]
    fn test_chunk_prefers_sentence_end() {
        let text = format!("{}. {}", "a".repeat(60), "b ".repeat(27));
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{}.", "a".repeat(60)));
        assert_eq!(chunks[1], "b ".repeat(27).trim_end());
    }

    #[test]
    fn test_chunk_prefers_latest_punctuation() {
        let chunks = chunk_text("Sit down, relax. Now breathe in and out", 24);
        assert_eq!(chunks, vec!["Sit down, relax.", "Now breathe in and out"]);

        let chunks = chunk_text("one two, three four five", 16);
        assert_eq!(chunks, vec!["one two,", "three four five"]);
    }

    #[test]
    fn test_chunk_breaks_after_danda() {
        let chunks = chunk_text("गहरी साँस लें। धीरे धीरे छोड़ें", 20);
        assert_eq!(chunks, vec!["गहरी साँस लें।", "धीरे धीरे छोड़ें"]);
    }

    #[test]
    fn test_chunk_ignores_punctuation_inside_words() {
        assert_eq!(chunk_text("pi is 3.14 ok", 11), vec!["pi is 3.14", "ok"]);
    }

    #[test]
    fn test_long_word_is_hard_split() {
        let chunks = chunk_text("hi abcdefghij yo", 4);
        assert_eq!(chunks, vec!["hi", "abcd", "efgh", "ij", "yo"]);
    }

    #[test]
    fn test_chunk_counts_characters_not_bytes() {
        // Each Devanagari letter is three bytes.
        let chunks = chunk_text("कखग घङच", 3);
        assert_eq!(chunks, vec!["कखग", "घङच"]);
    }

    #[tokio::test]
    async fn test_synthesize_concatenates_chunks() {
        let seen: Arc<Mutex<Vec<HashMap<String, String>>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let router = Router::new().route(
            "/translate_tts",
            get(move |Query(q): Query<HashMap<String, String>>| {
                let seen = Arc::clone(&seen_clone);
                async move {
                    let idx = q["idx"].clone();
                    seen.lock().unwrap().push(q);
                    format!("[{}]", idx)
                }
            }),
        );
        let base = spawn_server(router).await;
        let tts = synthesizer(base);

        let text = "word ".repeat(45);
        let audio = tts.synthesize(&text, "hi").await.unwrap();
        assert_eq!(audio, b"[0][1][2]".to_vec());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0]["tl"], "hi");
        assert_eq!(seen[0]["client"], "tw-ob");
        assert_eq!(seen[0]["total"], "3");
        assert!(seen.iter().all(|q| q["q"].chars().count() <= MAX_CHUNK_CHARS));
    }

    #[tokio::test]
    async fn test_synthesize_empty_text_is_error() {
        let tts = synthesizer("http://127.0.0.1:1".into());
        let err = tts.synthesize("   ", "en").await.unwrap_err();
        assert!(matches!(err, MindError::Synthesis(_)));
    }

    #[tokio::test]
    async fn test_synthesize_http_error() {
        let router = Router::new().route(
            "/translate_tts",
            get(|| async { StatusCode::TOO_MANY_REQUESTS }),
        );
        let base = spawn_server(router).await;
        let tts = synthesizer(base);
        let err = tts.synthesize("hello", "en").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mock = MockSpeechSynthesizer::new();
        let audio = mock.synthesize("hello", "kn").await.unwrap();
        assert_eq!(audio, mock.audio());
        assert_eq!(mock.calls(), vec![("hello".to_string(), "kn".to_string())]);

        let failing = MockSpeechSynthesizer::failing();
        assert!(failing.synthesize("hello", "kn").await.is_err());
        assert_eq!(failing.call_count(), 1);
    }
}
