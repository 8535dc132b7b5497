//! Per-user vocabulary: one dictionary per (user, language), holding the
//! words the user chose to keep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::speaker::SpeakerColor;
use crate::translation::WordTranslation;

/// A saved word.
///
/// `translations` stays empty and `translated` false until a translation
/// pass fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyWord {
    pub id: Uuid,
    pub user_id: String,
    pub word: String,
    pub source_language: String,
    pub color: SpeakerColor,
    pub translated: bool,
    pub translations: Vec<WordTranslation>,
    pub added_at: DateTime<Utc>,
}

impl VocabularyWord {
    pub fn new(
        user_id: impl Into<String>,
        word: impl Into<String>,
        source_language: impl Into<String>,
        color: SpeakerColor,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            word: word.into(),
            source_language: source_language.into(),
            color,
            translated: false,
            translations: Vec::new(),
            added_at: Utc::now(),
        }
    }
}

/// Catalog row for one of a user's dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionarySummary {
    pub id: Uuid,
    pub language: String,
    pub word_count: u32,
    pub flag_url: String,
}

/// Word card as listed inside a dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCard {
    pub id: Uuid,
    pub word: String,
    pub color: SpeakerColor,
    pub translated: bool,
    pub translations: Vec<WordTranslation>,
}

impl From<VocabularyWord> for WordCard {
    fn from(w: VocabularyWord) -> Self {
        Self {
            id: w.id,
            word: w.word,
            color: w.color,
            translated: w.translated,
            translations: w.translations,
        }
    }
}
