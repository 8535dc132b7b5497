//! Vocabulary service: saving, listing and forgetting words in a user's
//! per-language dictionaries.

use lingochat_types::error::ChatError;
use lingochat_types::notification::{NotificationEvent, WordSavedPayload};
use lingochat_types::speaker::SpeakerColor;
use lingochat_types::vocabulary::{DictionarySummary, VocabularyWord, WordCard};
use tracing::info;
use uuid::Uuid;

use crate::chat::view;
use crate::notify::emitter::NotificationEmitter;
use crate::repository::vocabulary::VocabularyRepository;

/// Card color for a word. Stable for a given spelling.
pub fn word_color(word: &str) -> SpeakerColor {
    let sum = word.chars().map(u32::from).fold(0u32, u32::wrapping_add);
    SpeakerColor::ALL[sum as usize % SpeakerColor::ALL.len()]
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, ChatError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ChatError::Validation(message.to_string()));
    }
    Ok(value)
}

pub struct VocabularyService<R: VocabularyRepository> {
    words: R,
    notifications: NotificationEmitter,
}

impl<R: VocabularyRepository> VocabularyService<R> {
    pub fn new(words: R, notifications: NotificationEmitter) -> Self {
        Self {
            words,
            notifications,
        }
    }

    pub fn repository(&self) -> &R {
        &self.words
    }

    /// Add a word to the user's dictionary for `language` and announce it
    /// with `WORD_SAVED`.
    #[tracing::instrument(name = "vocabulary.save", skip_all, fields(language = %language))]
    pub async fn save_word(
        &self,
        user_id: &str,
        word: &str,
        language: &str,
    ) -> Result<VocabularyWord, ChatError> {
        let user_id = required(user_id, "userId is required")?;
        let word = required(word, "Word is required")?;
        let language = required(language, "Language is required")?;

        let saved = VocabularyWord::new(user_id, word, language, word_color(word));
        self.words.add_word(&saved, &view::flag_url(language)).await?;
        info!(user_id, word_id = %saved.id, "Word saved");

        self.notifications
            .emit(NotificationEvent::word_saved(WordSavedPayload {
                user_id: user_id.to_string(),
                word: saved.word.clone(),
                language: language.to_string(),
            }));
        Ok(saved)
    }

    pub async fn list_dictionaries(&self, user_id: &str) -> Result<Vec<DictionarySummary>, ChatError> {
        let user_id = required(user_id, "userId is required")?;
        Ok(self.words.list_dictionaries(user_id).await?)
    }

    /// Word cards of one dictionary. A language the user has no dictionary
    /// for yields an empty list.
    pub async fn list_words(&self, user_id: &str, language: &str) -> Result<Vec<WordCard>, ChatError> {
        let language = required(language, "Language query parameter is required")?;
        let user_id = required(user_id, "userId is required")?;
        Ok(self
            .words
            .list_words(user_id, language)
            .await?
            .into_iter()
            .map(WordCard::from)
            .collect())
    }

    /// Remove one of the user's words. Unknown or malformed ids, and words
    /// owned by someone else, are `NotFound`.
    pub async fn forget_word(&self, user_id: &str, word_id: &str) -> Result<(), ChatError> {
        let user_id = required(user_id, "userId is required")?;
        let not_found = || ChatError::NotFound(format!("word '{word_id}'"));
        let id = Uuid::parse_str(word_id.trim()).map_err(|_| not_found())?;

        if !self.words.delete_word(user_id, id).await? {
            return Err(not_found());
        }
        info!(user_id, word_id = %id, "Word forgotten");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::sink::BoxNotificationSink;
    use crate::testing::{InMemoryVocabularyRepository, RecordingSink};
    use lingochat_types::notification::NotificationKind;
    use std::time::Duration;

    fn service() -> (VocabularyService<InMemoryVocabularyRepository>, RecordingSink) {
        let sink = RecordingSink::new();
        let service = VocabularyService::new(
            InMemoryVocabularyRepository::default(),
            NotificationEmitter::new(BoxNotificationSink::new(sink.clone()), Duration::from_secs(1)),
        );
        (service, sink)
    }

    #[test]
    fn test_word_color_is_stable() {
        assert_eq!(word_color("gato"), word_color("gato"));
        assert!(SpeakerColor::ALL.contains(&word_color("")));
    }

    #[tokio::test]
    async fn test_save_word_creates_dictionary_and_notifies() {
        let (service, sink) = service();

        let saved = service.save_word("u1", "  gato ", "Spanish").await.unwrap();
        assert_eq!(saved.word, "gato");
        assert_eq!(saved.source_language, "Spanish");
        assert_eq!(saved.color, word_color("gato"));
        service.save_word("u1", "perro", "Spanish").await.unwrap();
        service.save_word("u1", "Hund", "German").await.unwrap();

        let dictionaries = service.list_dictionaries("u1").await.unwrap();
        assert_eq!(dictionaries.len(), 2);
        assert_eq!(dictionaries[0].language, "Spanish");
        assert_eq!(dictionaries[0].word_count, 2);
        assert_eq!(
            dictionaries[0].flag_url,
            "https://hatscripts.github.io/circle-flags/flags/es.svg"
        );
        assert_eq!(dictionaries[1].word_count, 1);

        service.notifications.shutdown().await;
        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, NotificationKind::WordSaved);
        assert_eq!(events[0].user_id.as_deref(), Some("u1"));
        assert_eq!(events[0].data["word"], "gato");
        assert_eq!(events[0].data["language"], "Spanish");
    }

    #[tokio::test]
    async fn test_save_word_validation() {
        let (service, sink) = service();
        for (user, word, language) in [("", "gato", "Spanish"), ("u1", "  ", "Spanish"), ("u1", "gato", "")] {
            let err = service.save_word(user, word, language).await.unwrap_err();
            assert!(matches!(err, ChatError::Validation(_)));
        }
        assert!(service.list_dictionaries("u1").await.unwrap().is_empty());
        service.notifications.shutdown().await;
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_list_words_requires_language() {
        let (service, _sink) = service();
        let err = service.list_words("u1", " ").await.unwrap_err();
        assert!(
            matches!(err, ChatError::Validation(msg) if msg == "Language query parameter is required")
        );
    }

    #[tokio::test]
    async fn test_list_words_in_added_order() {
        let (service, _sink) = service();
        for word in ["uno", "dos", "tres"] {
            service.save_word("u1", word, "Spanish").await.unwrap();
        }
        service.save_word("u2", "cuatro", "Spanish").await.unwrap();

        let words: Vec<String> = service
            .list_words("u1", "Spanish")
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.word)
            .collect();
        assert_eq!(words, vec!["uno", "dos", "tres"]);
        assert!(service.list_words("u1", "French").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forget_word() {
        let (service, _sink) = service();
        let saved = service.save_word("u1", "gato", "Spanish").await.unwrap();
        let id = saved.id.to_string();

        let err = service.forget_word("u2", &id).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound(_)));

        service.forget_word("u1", &id).await.unwrap();
        assert!(service.list_words("u1", "Spanish").await.unwrap().is_empty());
        assert_eq!(service.list_dictionaries("u1").await.unwrap()[0].word_count, 0);

        let again = service.forget_word("u1", &id).await.unwrap_err();
        assert!(matches!(again, ChatError::NotFound(msg) if msg.contains(&id)));

        let malformed = service.forget_word("u1", "not-a-word-id").await.unwrap_err();
        assert!(matches!(malformed, ChatError::NotFound(_)));
    }
}
