//! Vocabulary repository trait definition.

use lingochat_types::error::RepositoryError;
use lingochat_types::vocabulary::{DictionarySummary, VocabularyWord};
use uuid::Uuid;

/// Repository trait for users' dictionaries and saved words.
///
/// A dictionary is keyed by `(user_id, language)` and exists once it holds
/// or has held a word.
pub trait VocabularyRepository: Send + Sync {
    /// Store a word, creating the owner's dictionary for
    /// `word.source_language` with `flag_url` if there is none yet.
    fn add_word(
        &self,
        word: &VocabularyWord,
        flag_url: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The user's dictionaries with their word counts, oldest first.
    fn list_dictionaries(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<DictionarySummary>, RepositoryError>> + Send;

    /// Words in the user's dictionary for `language`, in the order they were
    /// added. Empty when the dictionary does not exist.
    fn list_words(
        &self,
        user_id: &str,
        language: &str,
    ) -> impl std::future::Future<Output = Result<Vec<VocabularyWord>, RepositoryError>> + Send;

    /// Delete one of the user's words. Returns `false` if the user owns no
    /// word with that id.
    fn delete_word(
        &self,
        user_id: &str,
        word_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
