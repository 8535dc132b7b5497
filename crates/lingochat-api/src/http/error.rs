//! Application error type mapping to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use lingochat_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversation service errors.
    Chat(ChatError),
    /// Dependency outage detected by the adapter itself.
    Unavailable(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Chat(ChatError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Chat(e @ ChatError::NotFound(_)) => (StatusCode::NOT_FOUND, e.to_string()),
            AppError::Chat(e @ ChatError::Generation(_)) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::Chat(ChatError::Store(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %message, "Request rejected");
        }

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingochat_types::error::RepositoryError;

    fn status_of(err: ChatError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_chat_errors_map_to_status_codes() {
        assert_eq!(
            status_of(ChatError::Validation("Message text is required".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ChatError::NotFound("speaker 'ghost-999'".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ChatError::Generation("provider down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ChatError::Store(RepositoryError::Query("disk I/O error".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_details_are_not_leaked() {
        let err = AppError::from(ChatError::Store(RepositoryError::Query(
            "no such table: chat_sessions".into(),
        )));
        let (_, message) = err.status_and_message();
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = AppError::from(ChatError::Validation("userId is required".into()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "userId is required");
    }
}
