//! Chat session HTTP handlers.
//!
//! Endpoints (mounted under both `/chat` and `/chats`):
//! - GET  /session/{id}          - Open a session with its speaker
//! - POST /session/{id}/message  - Send a message and get the reply
//! - GET  /recent?userId=        - Recent chats for a user

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use lingochat_types::chat::{RecentChat, SendMessageOutcome, SessionView};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentChatsResponse {
    pub recent_chats: Vec<RecentChat>,
}

/// GET /chat/session/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let view = state.conversations.get_session(&session_id).await?;
    Ok(Json(view))
}

/// POST /chat/session/{id}/message
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<SendMessageOutcome>, AppError> {
    let text = body.text.unwrap_or_default();
    let user_id = body.user_id.as_deref().filter(|u| !u.trim().is_empty());

    let outcome = state
        .conversations
        .handle_inbound_message(&session_id, user_id, &text)
        .await?;
    Ok(Json(outcome))
}

/// GET /chats/recent?userId=
pub async fn recent_chats(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RecentChatsResponse>, AppError> {
    let user_id = query.user_id.unwrap_or_default();
    let recent_chats = state.conversations.list_recent_sessions(&user_id).await?;
    Ok(Json(RecentChatsResponse { recent_chats }))
}
