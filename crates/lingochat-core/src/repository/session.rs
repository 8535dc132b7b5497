//! SessionRepository trait definition.
//!
//! Sessions own an append-only message log. Message ids are assigned by the
//! repository inside `append_message` so that two writers can never hand out
//! the same id or overwrite each other's message.

use lingochat_types::chat::{ChatMessage, ChatSession, MessageDraft};
use lingochat_types::error::RepositoryError;

/// Repository trait for chat session and message persistence.
///
/// Implementations live in lingochat-infra (e.g., `SqliteSessionRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait SessionRepository: Send + Sync {
    /// Get a session with its full message log.
    fn find_by_id(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Insert a session unless one with the same id already exists.
    ///
    /// Returns the stored record, which is the pre-existing one when another
    /// writer created it first.
    fn create(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Atomically append a message, assigning `max(id) + 1` as its id.
    ///
    /// When `draft.touch_activity` is set, the session's `last_activity_at`
    /// moves to the message timestamp in the same write.
    /// Fails with `RepositoryError::NotFound` if the session does not exist.
    fn append_message(
        &self,
        session_id: &str,
        draft: &MessageDraft,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Sessions owned by a user, most recent activity first.
    ///
    /// Implementations may load only each session's last message; callers
    /// must not rely on the full log being present.
    fn list_recent_by_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;
}
