//! Axum router configuration with middleware.
//!
//! Chat routes are served under `/chat` and again under `/chats`, which the
//! client uses for `/chats/recent`. Vocabulary routes live under
//! `/dictionaries`. Middleware: CORS, request tracing.

use axum::Router;
use axum::extract::Request;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::http::handlers;
use crate::state::AppState;

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/session/{id}", get(handlers::chat::get_session))
        .route("/session/{id}/message", post(handlers::chat::send_message))
        .route("/recent", get(handlers::chat::recent_chats))
}

fn vocabulary_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(handlers::vocabulary::catalog))
        .route(
            "/words",
            get(handlers::vocabulary::list_words).post(handlers::vocabulary::save_word),
        )
        .route("/words/{id}/forget", post(handlers::vocabulary::forget_word))
}

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http.request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %Uuid::now_v7(),
        )
    });

    Router::new()
        .nest("/chat", chat_routes())
        .nest("/chats", chat_routes())
        .nest("/dictionaries", vocabulary_routes())
        .route("/translate", post(handlers::translate::translate_word))
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(trace)
        .with_state(state)
}
