//! Word translation handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use lingochat_types::translation::WordTranslation;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub from_language: String,
    #[serde(default)]
    pub to_languages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translations: Vec<WordTranslation>,
}

/// POST /translate
pub async fn translate_word(
    State(state): State<AppState>,
    Json(body): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    let translations = state
        .conversations
        .translate_word(&body.word, &body.from_language, &body.to_languages)
        .await?;
    Ok(Json(TranslateResponse { translations }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_request_camel_case() {
        let body: TranslateRequest = serde_json::from_str(
            r#"{"word":"hello","fromLanguage":"English","toLanguages":["French","German"]}"#,
        )
        .unwrap();
        assert_eq!(body.word, "hello");
        assert_eq!(body.from_language, "English");
        assert_eq!(body.to_languages, vec!["French", "German"]);
    }
}
