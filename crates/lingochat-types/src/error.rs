use thiserror::Error;

/// Errors from repository operations (used by trait definitions in lingochat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the conversation service.
///
/// `NotFound` and `Validation` are raised before anything is written.
/// `Generation` is raised after the user's turn has already been stored.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("error generating chat response: {0}")]
    Generation(String),

    #[error("storage error: {0}")]
    Store(#[from] RepositoryError),
}

/// Errors from publishing to a notification sink.
///
/// These never leave the notification emitter; they are logged only.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("invalid sink configuration: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("sink rejected message: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("publish timed out after {0}ms")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::NotFound("speaker 'ghost-000'".to_string());
        assert_eq!(err.to_string(), "speaker 'ghost-000' not found");

        let err: ChatError = RepositoryError::Connection.into();
        assert!(matches!(err, ChatError::Store(RepositoryError::Connection)));
    }

    #[test]
    fn test_notification_error_display() {
        let err = NotificationError::Rejected {
            status: 401,
            body: "bad token".to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("bad token"));
    }
}
