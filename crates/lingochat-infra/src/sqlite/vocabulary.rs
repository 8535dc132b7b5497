//! SQLite vocabulary implementation.
//!
//! Ids are stored as hyphenated UUID text and translations as a JSON array.

use chrono::Utc;
use lingochat_core::repository::vocabulary::VocabularyRepository;
use lingochat_types::error::RepositoryError;
use lingochat_types::speaker::SpeakerColor;
use lingochat_types::translation::WordTranslation;
use lingochat_types::vocabulary::{DictionarySummary, VocabularyWord};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `VocabularyRepository`.
pub struct SqliteVocabularyRepository {
    pool: DatabasePool,
}

impl SqliteVocabularyRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid id '{s}': {e}")))
}

struct WordRow {
    id: String,
    user_id: String,
    word: String,
    source_language: String,
    color: String,
    translated: bool,
    translations: String,
    added_at: String,
}

impl WordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            word: row.try_get("word")?,
            source_language: row.try_get("source_language")?,
            color: row.try_get("color")?,
            translated: row.try_get("translated")?,
            translations: row.try_get("translations")?,
            added_at: row.try_get("added_at")?,
        })
    }

    fn into_word(self) -> Result<VocabularyWord, RepositoryError> {
        let translations: Vec<WordTranslation> = serde_json::from_str(&self.translations)
            .map_err(|e| RepositoryError::Query(format!("invalid translations: {e}")))?;
        let color: SpeakerColor = self.color.parse().map_err(RepositoryError::Query)?;

        Ok(VocabularyWord {
            id: parse_uuid(&self.id)?,
            user_id: self.user_id,
            word: self.word,
            source_language: self.source_language,
            color,
            translated: self.translated,
            translations,
            added_at: parse_datetime(&self.added_at)?,
        })
    }
}

impl VocabularyRepository for SqliteVocabularyRepository {
    async fn add_word(&self, word: &VocabularyWord, flag_url: &str) -> Result<(), RepositoryError> {
        let translations = serde_json::to_string(&word.translations)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO dictionaries (id, user_id, language, flag_url, created_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(user_id, language) DO NOTHING"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(&word.user_id)
        .bind(&word.source_language)
        .bind(flag_url)
        .bind(format_datetime(&Utc::now()))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO words (id, dictionary_id, user_id, word, source_language, color,
                                  translated, translations, added_at)
               SELECT ?, d.id, ?, ?, ?, ?, ?, ?, ?
               FROM dictionaries d WHERE d.user_id = ? AND d.language = ?"#,
        )
        .bind(word.id.to_string())
        .bind(&word.user_id)
        .bind(&word.word)
        .bind(&word.source_language)
        .bind(word.color.as_str())
        .bind(word.translated)
        .bind(&translations)
        .bind(format_datetime(&word.added_at))
        .bind(&word.user_id)
        .bind(&word.source_language)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.message().contains("UNIQUE")
            {
                return RepositoryError::Conflict(format!("word {} already stored", word.id));
            }
            RepositoryError::Query(e.to_string())
        })?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn list_dictionaries(&self, user_id: &str) -> Result<Vec<DictionarySummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT d.id, d.language, d.flag_url, COUNT(w.id) AS word_count
               FROM dictionaries d
               LEFT JOIN words w ON w.dictionary_id = d.id
               WHERE d.user_id = ?
               GROUP BY d.id
               ORDER BY d.created_at ASC, d.id ASC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let id: String = row
                    .try_get("id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let word_count: i64 = row
                    .try_get("word_count")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(DictionarySummary {
                    id: parse_uuid(&id)?,
                    language: row
                        .try_get("language")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    word_count: u32::try_from(word_count).unwrap_or(u32::MAX),
                    flag_url: row
                        .try_get("flag_url")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                })
            })
            .collect()
    }

    async fn list_words(
        &self,
        user_id: &str,
        language: &str,
    ) -> Result<Vec<VocabularyWord>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT w.* FROM words w
               JOIN dictionaries d ON d.id = w.dictionary_id
               WHERE d.user_id = ? AND d.language = ?
               ORDER BY w.added_at ASC, w.id ASC"#,
        )
        .bind(user_id)
        .bind(language)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                WordRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_word()
            })
            .collect()
    }

    async fn delete_word(&self, user_id: &str, word_id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM words WHERE id = ? AND user_id = ?")
            .bind(word_id.to_string())
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
