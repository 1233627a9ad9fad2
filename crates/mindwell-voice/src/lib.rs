//! MindWell voice crate - speech recognition and synthesis adapters.
//!
//! Provides trait-based abstractions over the cloud speech services used by
//! the voice front-end, the HTTP clients that implement them, and mock
//! implementations for tests.

pub mod audio;
pub mod recognition;
pub mod synthesis;

pub use audio::{AudioClip, AudioFormat};
pub use recognition::{
    GoogleSpeechRecognizer, MockSpeechRecognizer, SpeechRecognizer, TranscriptionOutcome,
};
pub use synthesis::{GoogleTranslateSynthesizer, MockSpeechSynthesizer, SpeechSynthesizer};
