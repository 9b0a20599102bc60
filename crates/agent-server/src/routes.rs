//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    chat_handler, forget_conversation, get_conversation, health_check, list_intents,
};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/intents", get(list_intents))
        // Agent API
        .route("/api/chat", post(chat_handler))
        .route(
            "/api/conversations/{id}",
            get(get_conversation).delete(forget_conversation),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
