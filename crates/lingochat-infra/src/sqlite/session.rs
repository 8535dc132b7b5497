//! SQLite chat session repository implementation.
//!
//! Messages live in `chat_messages` keyed by `(session_id, id)`. New ids are
//! computed inside the INSERT itself, so even writers in other processes
//! cannot hand out the same id twice.

use lingochat_core::repository::session::SessionRepository;
use lingochat_types::chat::{ChatMessage, ChatSession, MessageDraft, Sender};
use lingochat_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn load_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM chat_messages WHERE session_id = ? ORDER BY id ASC")
            .bind(session_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }
        Ok(messages)
    }

    async fn hydrate(&self, row: &sqlx::sqlite::SqliteRow) -> Result<ChatSession, RepositoryError> {
        let session_row =
            ChatSessionRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        let messages = self.load_messages(&session_row.id).await?;
        session_row.into_session(messages)
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatSessionRow {
    id: String,
    user_id: Option<String>,
    speaker_id: String,
    last_activity_at: String,
    created_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            speaker_id: row.try_get("speaker_id")?,
            last_activity_at: row.try_get("last_activity_at")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self, messages: Vec<ChatMessage>) -> Result<ChatSession, RepositoryError> {
        Ok(ChatSession {
            id: self.id,
            user_id: self.user_id,
            speaker_id: self.speaker_id,
            messages,
            last_activity_at: parse_datetime(&self.last_activity_at)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct ChatMessageRow {
    id: i64,
    sender: String,
    text: String,
    timestamp: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    /// The `last_*` columns of a recent-sessions row, if the session has
    /// any message.
    fn from_last_columns(row: &sqlx::sqlite::SqliteRow) -> Result<Option<Self>, sqlx::Error> {
        let Some(id) = row.try_get::<Option<i64>, _>("last_id")? else {
            return Ok(None);
        };
        Ok(Some(Self {
            id,
            sender: row.try_get("last_sender")?,
            text: row.try_get("last_text")?,
            timestamp: row.try_get("last_timestamp")?,
        }))
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = u32::try_from(self.id)
            .map_err(|_| RepositoryError::Query(format!("invalid message id: {}", self.id)))?;
        let sender: Sender = self.sender.parse().map_err(RepositoryError::Query)?;

        Ok(ChatMessage {
            id,
            sender,
            text: self.text,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

// ---------------------------------------------------------------------------
// SessionRepository implementation
// ---------------------------------------------------------------------------

impl SessionRepository for SqliteSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO chat_sessions (id, user_id, speaker_id, last_activity_at, created_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(id) DO NOTHING"#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.speaker_id)
        .bind(format_datetime(&session.last_activity_at))
        .bind(format_datetime(&session.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 1 && session.messages.is_empty() {
            return Ok(session.clone());
        }

        // Lost the race (or the caller passed messages we do not insert
        // here): hand back what is actually stored.
        self.find_by_id(&session.id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn append_message(
        &self,
        session_id: &str,
        draft: &MessageDraft,
    ) -> Result<ChatMessage, RepositoryError> {
        let timestamp = format_datetime(&draft.timestamp);

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let exists = sqlx::query("SELECT 1 FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let row = sqlx::query(
            r#"INSERT INTO chat_messages (session_id, id, sender, text, timestamp)
               SELECT ?, COALESCE(MAX(id), 0) + 1, ?, ?, ?
               FROM chat_messages WHERE session_id = ?
               RETURNING id"#,
        )
        .bind(session_id)
        .bind(draft.sender.to_string())
        .bind(&draft.text)
        .bind(&timestamp)
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.message().contains("UNIQUE")
            {
                return RepositoryError::Conflict(format!(
                    "message id already taken in session {session_id}"
                ));
            }
            RepositoryError::Query(e.to_string())
        })?;
        let id: i64 = row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if draft.touch_activity {
            sqlx::query("UPDATE chat_sessions SET last_activity_at = ? WHERE id = ?")
                .bind(&timestamp)
                .bind(session_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        ChatMessageRow {
            id,
            sender: draft.sender.to_string(),
            text: draft.text.clone(),
            timestamp,
        }
        .into_message()
    }

    async fn list_recent_by_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        // One row per session carrying only its newest message.
        let rows = sqlx::query(
            r#"SELECT s.*, m.id AS last_id, m.sender AS last_sender,
                      m.text AS last_text, m.timestamp AS last_timestamp
               FROM chat_sessions s
               LEFT JOIN chat_messages m
                 ON m.session_id = s.id
                AND m.id = (SELECT MAX(id) FROM chat_messages WHERE session_id = s.id)
               WHERE s.user_id = ?
               ORDER BY s.last_activity_at DESC
               LIMIT ?"#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row =
                ChatSessionRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            let last = ChatMessageRow::from_last_columns(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .map(ChatMessageRow::into_message)
                .transpose()?;
            sessions.push(session_row.into_session(last.into_iter().collect())?);
        }
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    async fn repo_with_session(id: &str, user_id: Option<&str>) -> SqliteSessionRepository {
        let repo = SqliteSessionRepository::new(test_pool().await);
        let session = ChatSession::new(id.into(), user_id.map(str::to_string), "aurora-001".into());
        repo.create(&session).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo_with_session("chat_aurora-001", Some("u1")).await;

        let loaded = repo.find_by_id("chat_aurora-001").await.unwrap().unwrap();
        assert_eq!(loaded.speaker_id, "aurora-001");
        assert_eq!(loaded.user_id.as_deref(), Some("u1"));
        assert!(loaded.messages.is_empty());

        assert!(repo.find_by_id("chat_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_is_insert_if_absent() {
        let repo = repo_with_session("chat_aurora-001", Some("u1")).await;
        repo.append_message("chat_aurora-001", &MessageDraft::user("Hola"))
            .await
            .unwrap();

        let duplicate = ChatSession::new("chat_aurora-001".into(), Some("u2".into()), "hans-002".into());
        let stored = repo.create(&duplicate).await.unwrap();
        assert_eq!(stored.user_id.as_deref(), Some("u1"));
        assert_eq!(stored.speaker_id, "aurora-001");
        assert_eq!(stored.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_append_assigns_sequential_ids() {
        let repo = repo_with_session("chat_aurora-001", None).await;

        let first = repo
            .append_message("chat_aurora-001", &MessageDraft::user("Hola"))
            .await
            .unwrap();
        let second = repo
            .append_message("chat_aurora-001", &MessageDraft::speaker("¡Hola! ¿Qué tal?"))
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.sender, Sender::Speaker);

        let loaded = repo.find_by_id("chat_aurora-001").await.unwrap().unwrap();
        let ids: Vec<u32> = loaded.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(loaded.messages[1].text, "¡Hola! ¿Qué tal?");
    }

    #[tokio::test]
    async fn test_only_replies_touch_activity() {
        let repo = repo_with_session("chat_aurora-001", None).await;
        let before = repo
            .find_by_id("chat_aurora-001")
            .await
            .unwrap()
            .unwrap()
            .last_activity_at;

        let mut user = MessageDraft::user("Hola");
        user.timestamp = Utc::now() + Duration::minutes(1);
        repo.append_message("chat_aurora-001", &user).await.unwrap();
        let after_user = repo.find_by_id("chat_aurora-001").await.unwrap().unwrap();
        assert_eq!(after_user.last_activity_at, before);

        let mut reply = MessageDraft::speaker("¡Hola!");
        reply.timestamp = Utc::now() + Duration::minutes(2);
        let stored = repo.append_message("chat_aurora-001", &reply).await.unwrap();
        let after_reply = repo.find_by_id("chat_aurora-001").await.unwrap().unwrap();
        assert_eq!(after_reply.last_activity_at, stored.timestamp);
        assert!(after_reply.last_activity_at > before);
    }

    #[tokio::test]
    async fn test_append_to_missing_session_is_not_found() {
        let repo = SqliteSessionRepository::new(test_pool().await);
        let err = repo
            .append_message("chat_missing", &MessageDraft::user("Hola"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_concurrent_appends_never_collide() {
        let repo = Arc::new(repo_with_session("chat_aurora-001", None).await);

        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.append_message("chat_aurora-001", &MessageDraft::user(format!("m{i}")))
                    .await
                    .unwrap()
                    .id
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        assert_eq!(ids, (1..=20).collect::<Vec<u32>>());

        let loaded = repo.find_by_id("chat_aurora-001").await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 20);
    }

    #[tokio::test]
    async fn test_list_recent_by_user() {
        let repo = SqliteSessionRepository::new(test_pool().await);
        let now = Utc::now();
        for i in 0..12 {
            let mut session = ChatSession::new(format!("chat_{i}"), Some("u1".into()), "aurora-001".into());
            session.last_activity_at = now - Duration::minutes(i);
            repo.create(&session).await.unwrap();
        }
        let other = ChatSession::new("chat_other".into(), Some("u2".into()), "hans-002".into());
        repo.create(&other).await.unwrap();
        repo.append_message("chat_3", &MessageDraft::user("Hola"))
            .await
            .unwrap();

        let recent = repo.list_recent_by_user("u1", 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].id, "chat_0");
        assert_eq!(recent[9].id, "chat_9");
        assert_eq!(recent[3].messages.len(), 1);
        assert!(recent[0].messages.is_empty());
        assert!(
            recent
                .windows(2)
                .all(|w| w[0].last_activity_at >= w[1].last_activity_at)
        );

        assert!(repo.list_recent_by_user("nobody", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_recent_loads_only_last_message() {
        let repo = repo_with_session("chat_aurora-001", Some("u1")).await;
        for text in ["Hola", "¡Hola!", "¿Qué tal?", "Muy bien, gracias"] {
            repo.append_message("chat_aurora-001", &MessageDraft::speaker(text))
                .await
                .unwrap();
        }

        let recent = repo.list_recent_by_user("u1", 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].messages.len(), 1);
        assert_eq!(recent[0].messages[0].id, 4);
        assert_eq!(recent[0].messages[0].text, "Muy bien, gracias");
        assert_eq!(recent[0].messages[0].sender, Sender::Speaker);
    }

    #[tokio::test]
    async fn test_messages_cascade_with_session() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool.clone());
        let session = ChatSession::new("chat_x".into(), None, "aurora-001".into());
        repo.create(&session).await.unwrap();
        repo.append_message("chat_x", &MessageDraft::user("Hola"))
            .await
            .unwrap();

        sqlx::query("DELETE FROM chat_sessions WHERE id = 'chat_x'")
            .execute(&pool.writer)
            .await
            .unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_messages")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
