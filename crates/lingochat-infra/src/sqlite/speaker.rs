//! SQLite speaker catalog implementation.
//!
//! Personality and interest lists are stored as JSON string arrays.

use lingochat_core::repository::speaker::SpeakerRepository;
use lingochat_types::error::RepositoryError;
use lingochat_types::speaker::{Speaker, SpeakerColor};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `SpeakerRepository`.
pub struct SqliteSpeakerRepository {
    pool: DatabasePool,
}

impl SqliteSpeakerRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SpeakerRow {
    id: String,
    name: String,
    language: String,
    flag_emoji: String,
    avatar_seed: String,
    personality: String,
    interests: String,
    color: String,
    created_at: String,
}

impl SpeakerRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            language: row.try_get("language")?,
            flag_emoji: row.try_get("flag_emoji")?,
            avatar_seed: row.try_get("avatar_seed")?,
            personality: row.try_get("personality")?,
            interests: row.try_get("interests")?,
            color: row.try_get("color")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_speaker(self) -> Result<Speaker, RepositoryError> {
        let personality: Vec<String> = serde_json::from_str(&self.personality)
            .map_err(|e| RepositoryError::Query(format!("invalid personality list: {e}")))?;
        let interests: Vec<String> = serde_json::from_str(&self.interests)
            .map_err(|e| RepositoryError::Query(format!("invalid interests list: {e}")))?;
        let color: SpeakerColor = self.color.parse().map_err(RepositoryError::Query)?;

        Ok(Speaker {
            id: self.id,
            name: self.name,
            language: self.language,
            flag_emoji: self.flag_emoji,
            avatar_seed: self.avatar_seed,
            personality,
            interests,
            color,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Speaker>, RepositoryError> {
    rows.iter()
        .map(|row| {
            SpeakerRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_speaker()
        })
        .collect()
}

impl SpeakerRepository for SqliteSpeakerRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Speaker>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM speakers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let speaker_row =
                    SpeakerRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(speaker_row.into_speaker()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Speaker>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM speakers WHERE id IN ({placeholders}) ORDER BY id");
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        map_rows(&rows)
    }

    async fn list(&self) -> Result<Vec<Speaker>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM speakers ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        map_rows(&rows)
    }

    async fn upsert(&self, speaker: &Speaker) -> Result<(), RepositoryError> {
        let personality = serde_json::to_string(&speaker.personality)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let interests = serde_json::to_string(&speaker.interests)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO speakers (id, name, language, flag_emoji, avatar_seed, personality, interests, color, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   language = excluded.language,
                   flag_emoji = excluded.flag_emoji,
                   avatar_seed = excluded.avatar_seed,
                   personality = excluded.personality,
                   interests = excluded.interests,
                   color = excluded.color"#,
        )
        .bind(&speaker.id)
        .bind(&speaker.name)
        .bind(&speaker.language)
        .bind(&speaker.flag_emoji)
        .bind(&speaker.avatar_seed)
        .bind(personality)
        .bind(interests)
        .bind(speaker.color.as_str())
        .bind(format_datetime(&speaker.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::speaker_catalog;
    use crate::sqlite::pool::test_pool;

    async fn seeded_repo() -> SqliteSpeakerRepository {
        let repo = SqliteSpeakerRepository::new(test_pool().await);
        for speaker in speaker_catalog() {
            repo.upsert(&speaker).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_upsert_and_find_by_id() {
        let repo = seeded_repo().await;

        let aurora = repo.find_by_id("aurora-001").await.unwrap().unwrap();
        assert_eq!(aurora.name, "Aurora");
        assert_eq!(aurora.language, "Spanish");
        assert_eq!(aurora.personality, vec!["Friendly", "Patient", "Encouraging"]);
        assert_eq!(aurora.interests, vec!["Music", "Travel", "Culture"]);
        assert_eq!(aurora.color, SpeakerColor::Pink);

        assert!(repo.find_by_id("ghost-000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let repo = seeded_repo().await;
        let mut hans = repo.find_by_id("hans-002").await.unwrap().unwrap();
        hans.color = SpeakerColor::Indigo;
        hans.interests.push("Beer".to_string());
        repo.upsert(&hans).await.unwrap();

        let reloaded = repo.find_by_id("hans-002").await.unwrap().unwrap();
        assert_eq!(reloaded.color, SpeakerColor::Indigo);
        assert_eq!(reloaded.interests.len(), 4);
        assert_eq!(repo.list().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_unknown() {
        let repo = seeded_repo().await;
        let ids = vec![
            "yuki-007".to_string(),
            "ghost-000".to_string(),
            "aurora-001".to_string(),
        ];
        let found = repo.find_by_ids(&ids).await.unwrap();
        let found_ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(found_ids, vec!["aurora-001", "yuki-007"]);

        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = seeded_repo().await;
        let all = repo.list().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn test_malformed_row_is_a_query_error() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO speakers (id, name, language, flag_emoji, avatar_seed, personality, interests, color, created_at)
             VALUES ('bad-001', 'Bad', 'Spanish', '', 'Bad', 'not json', '[]', 'teal', '2026-01-01T00:00:00Z')",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        let repo = SqliteSpeakerRepository::new(pool);
        let err = repo.find_by_id("bad-001").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(msg) if msg.contains("personality")));
    }
}
