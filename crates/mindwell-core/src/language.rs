//! Language registry.
//!
//! Maps the human-readable language names shown in the picker to the codes
//! each downstream provider needs. The tables are process-wide constants.
//! Each sub-table is looked up independently and falls back to its own
//! default when a name is missing.

use serde::Serialize;

/// Language selected for a new session.
pub const DEFAULT_LANGUAGE: &str = "English";

const DEFAULT_CHAT_CODE: &str = "en";
const DEFAULT_RECOGNITION_LOCALE: &str = "en-IN";
const DEFAULT_SYNTHESIS_LOCALE: &str = "en";

/// Picker order. Chat codes are keyed by the same names.
const CHAT_CODES: &[(&str, &str)] = &[
    ("English", "en"),
    ("हिन्दी (Hindi)", "hi"),
    ("ଓଡ଼ିଆ (Odia)", "or"),
    ("ಕನ್ನಡ (Kannada)", "kn"),
    ("ਪੰਜਾਬੀ (Punjabi)", "pa"),
    ("বাংলা (Bengali)", "bn"),
];

const RECOGNITION_LOCALES: &[(&str, &str)] = &[
    ("English", "en-IN"),
    ("ਪੰਜਾਬੀ (Punjabi)", "pa-IN"),
    ("বাংলা (Bengali)", "bn-IN"),
    ("ಕನ್ನಡ (Kannada)", "kn-IN"),
    ("ଓଡ଼ିଆ (Odia)", "or-IN"),
    ("हिन्दी (Hindi)", "hi-IN"),
];

const SYNTHESIS_LOCALES: &[(&str, &str)] = &[
    ("English", "en"),
    ("ਪੰਜਾਬੀ (Punjabi)", "pa"),
    ("বাংলা (Bengali)", "bn"),
    ("ಕನ್ನಡ (Kannada)", "kn"),
    ("ଓଡ଼ିଆ (Odia)", "or"),
    ("हिन्दी (Hindi)", "hi"),
];

/// Everything the providers need to know about one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub display_name: String,
    /// Code used to decide prompt framing ("en" means no framing).
    pub chat_code: &'static str,
    /// Locale tag sent to speech recognition, e.g. "hi-IN".
    pub recognition_locale: &'static str,
    /// Locale tag sent to speech synthesis, e.g. "hi".
    pub synthesis_locale: &'static str,
}

impl LanguageEntry {
    /// Whether replies must be explicitly requested in this language.
    pub fn needs_framing(&self) -> bool {
        self.chat_code != DEFAULT_CHAT_CODE
    }
}

/// Static lookup over the supported languages.
pub struct LanguageRegistry;

impl LanguageRegistry {
    /// Resolve a display name. Never fails: unknown names get the defaults.
    pub fn resolve(display_name: &str) -> LanguageEntry {
        LanguageEntry {
            display_name: display_name.to_string(),
            chat_code: lookup(CHAT_CODES, display_name).unwrap_or(DEFAULT_CHAT_CODE),
            recognition_locale: lookup(RECOGNITION_LOCALES, display_name)
                .unwrap_or(DEFAULT_RECOGNITION_LOCALE),
            synthesis_locale: lookup(SYNTHESIS_LOCALES, display_name)
                .unwrap_or(DEFAULT_SYNTHESIS_LOCALE),
        }
    }

    /// Exact-match membership check against the picker table.
    pub fn is_supported(display_name: &str) -> bool {
        lookup(CHAT_CODES, display_name).is_some()
    }

    /// Display names in picker order.
    pub fn display_names() -> impl Iterator<Item = &'static str> {
        CHAT_CODES.iter().map(|(name, _)| *name)
    }

    /// Fully resolved entries in picker order.
    pub fn entries() -> Vec<LanguageEntry> {
        Self::display_names().map(Self::resolve).collect()
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| *code)
}
