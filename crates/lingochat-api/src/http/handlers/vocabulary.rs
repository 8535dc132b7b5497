//! Vocabulary HTTP handlers.
//!
//! Endpoints (mounted under `/dictionaries`):
//! - GET  /catalog?userId=                 - A user's dictionaries
//! - GET  /words?userId=&language=         - Words in one dictionary
//! - POST /words                           - Save a word
//! - POST /words/{id}/forget               - Remove a word

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use lingochat_types::vocabulary::{DictionarySummary, VocabularyWord, WordCard};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWordRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgetWordRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub dictionaries: Vec<DictionarySummary>,
}

#[derive(Debug, Serialize)]
pub struct WordsResponse {
    pub words: Vec<WordCard>,
}

#[derive(Debug, Serialize)]
pub struct SaveWordResponse {
    pub success: bool,
    pub word: VocabularyWord,
}

#[derive(Debug, Serialize)]
pub struct ForgetWordResponse {
    pub success: bool,
    pub message: &'static str,
}

/// GET /dictionaries/catalog?userId=
pub async fn catalog(
    State(state): State<AppState>,
    Query(query): Query<VocabularyQuery>,
) -> Result<Json<CatalogResponse>, AppError> {
    let user_id = query.user_id.unwrap_or_default();
    let dictionaries = state.vocabulary.list_dictionaries(&user_id).await?;
    Ok(Json(CatalogResponse { dictionaries }))
}

/// GET /dictionaries/words?userId=&language=
pub async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<VocabularyQuery>,
) -> Result<Json<WordsResponse>, AppError> {
    let user_id = query.user_id.unwrap_or_default();
    let language = query.language.unwrap_or_default();
    let words = state.vocabulary.list_words(&user_id, &language).await?;
    Ok(Json(WordsResponse { words }))
}

/// POST /dictionaries/words
pub async fn save_word(
    State(state): State<AppState>,
    Json(body): Json<SaveWordRequest>,
) -> Result<(StatusCode, Json<SaveWordResponse>), AppError> {
    let word = state
        .vocabulary
        .save_word(&body.user_id, &body.word, &body.language)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SaveWordResponse {
            success: true,
            word,
        }),
    ))
}

/// POST /dictionaries/words/{id}/forget
///
/// The owner may be given as `{"userId": ...}` in the body or as
/// `?userId=`. An empty or unreadable body falls back to the query.
pub async fn forget_word(
    State(state): State<AppState>,
    Path(word_id): Path<String>,
    Query(query): Query<VocabularyQuery>,
    body: Bytes,
) -> Result<Json<ForgetWordResponse>, AppError> {
    let user_id = owner_from_body(&body).or(query.user_id).unwrap_or_default();
    state.vocabulary.forget_word(&user_id, &word_id).await?;
    Ok(Json(ForgetWordResponse {
        success: true,
        message: "Word removed successfully",
    }))
}

fn owner_from_body(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ForgetWordRequest>(body)
        .ok()
        .and_then(|b| b.user_id)
        .filter(|u| !u.trim().is_empty())
}
