//! Word translation results.

use serde::{Deserialize, Serialize};

/// Color used for placeholder translations.
pub const DEFAULT_TRANSLATION_COLOR: &str = "teal";

/// One translated form of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTranslation {
    pub language: String,
    pub word: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_TRANSLATION_COLOR.to_string()
}

impl WordTranslation {
    /// Untranslated stand-in used when the completion service cannot help.
    pub fn placeholder(language: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            word: word.into(),
            color: default_color(),
        }
    }
}
