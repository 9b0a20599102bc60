//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use agent_core::IntentDefinition;

use crate::memory::Turn;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub intent: String,
    pub confidence: f64,
    pub agent: Option<String>,
    pub conversation_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn conversation_not_found(conversation_id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("No conversation with id '{conversation_id}'"),
            code: "CONVERSATION_NOT_FOUND".into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        provider: state.provider.name().to_string(),
        provider_connected,
    })
}

/// Registered intents in registration order
pub async fn list_intents(State(state): State<AppState>) -> Json<Vec<IntentDefinition>> {
    let orchestrator = state.orchestrator.lock().await;
    Json(orchestrator.intents().to_vec())
}

/// Main chat endpoint: classify, route, answer
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message must not be empty".into(),
                code: "EMPTY_MESSAGE".into(),
            }),
        ));
    }

    let conversation_id = payload
        .conversation_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let dispatch = {
        let orchestrator = state.orchestrator.lock().await;
        orchestrator.route(&payload.message).await
    };

    state
        .conversations
        .record(&conversation_id, &payload.message, &dispatch.reply);

    tracing::info!(
        %conversation_id,
        intent = %dispatch.intent.name,
        agent = ?dispatch.agent,
        "Chat handled"
    );

    Ok(Json(ChatResponse {
        message: dispatch.reply,
        intent: dispatch.intent.name,
        confidence: dispatch.intent.confidence,
        agent: dispatch.agent,
        conversation_id,
    }))
}

/// Recorded history of one conversation
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let turns = state
        .conversations
        .history(&conversation_id)
        .ok_or_else(|| conversation_not_found(&conversation_id))?;

    Ok(Json(ConversationResponse {
        conversation_id,
        turns,
    }))
}

/// Drop a conversation's history
pub async fn forget_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.conversations.forget(&conversation_id) {
        tracing::info!(%conversation_id, "Conversation forgotten");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(conversation_not_found(&conversation_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Role;
    use crate::testing::{CannedProvider, state_with};

    fn chat(message: &str, conversation_id: Option<&str>) -> Json<ChatRequest> {
        Json(ChatRequest {
            message: message.into(),
            conversation_id: conversation_id.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_health_reports_provider() {
        let state = state_with(CannedProvider::new([]));
        let Json(health) = health_check(State(state)).await;

        assert_eq!(health.status, "healthy");
        assert_eq!(health.provider, "canned");
        assert!(health.provider_connected);
    }

    #[tokio::test]
    async fn test_list_intents_in_registration_order() {
        let state = state_with(CannedProvider::new([]));
        let Json(intents) = list_intents(State(state)).await;

        let names: Vec<_> = intents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["greeting", "calculate", "out_of_scope"]);
    }

    #[tokio::test]
    async fn test_chat_routes_and_keeps_conversation_id() {
        let state = state_with(CannedProvider::new([
            r#"{"intent": "greeting", "confidence": 0.95, "entities": {}, "reasoning": "hi"}"#,
            "Hello! How can I help?",
        ]));

        let Json(reply) = chat_handler(
            State(state),
            Json(ChatRequest {
                message: "Hello".into(),
                conversation_id: Some("conv-1".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(reply.message, "[Greeting Agent] Hello! How can I help?");
        assert_eq!(reply.intent, "greeting");
        assert!((reply.confidence - 0.95).abs() < f64::EPSILON);
        assert_eq!(reply.agent.as_deref(), Some("Greeting Agent"));
        assert_eq!(reply.conversation_id, "conv-1");
    }

    #[tokio::test]
    async fn test_chat_assigns_conversation_id() {
        let state = state_with(CannedProvider::new([]));

        let Json(reply) = chat_handler(
            State(state),
            Json(ChatRequest {
                message: "anything".into(),
                conversation_id: None,
            }),
        )
        .await
        .unwrap();

        assert!(uuid::Uuid::parse_str(&reply.conversation_id).is_ok());
        // Classification failed and the out-of-scope agent apologized
        assert_eq!(reply.intent, "out_of_scope");
        assert_eq!(reply.confidence, 0.0);
        assert_eq!(
            reply.message,
            "[OutOfScope Agent] I apologize, I'm having trouble responding."
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let state = state_with(CannedProvider::new([]));

        let (status, Json(error)) = chat_handler(
            State(state),
            Json(ChatRequest {
                message: "   ".into(),
                conversation_id: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "EMPTY_MESSAGE");
    }

    #[tokio::test]
    async fn test_chat_records_turns_per_conversation() {
        let state = state_with(CannedProvider::new([
            r#"{"intent": "greeting", "confidence": 0.95, "entities": {}, "reasoning": "hi"}"#,
            "Hello! How can I help?",
            r#"{"intent": "greeting", "confidence": 0.9, "entities": {}, "reasoning": "hi"}"#,
            "Hi again!",
        ]));

        chat_handler(State(state.clone()), chat("Hello", Some("conv-1")))
            .await
            .unwrap();
        chat_handler(State(state.clone()), chat("Hey there", Some("conv-2")))
            .await
            .unwrap();

        let Json(first) = get_conversation(State(state.clone()), Path("conv-1".into()))
            .await
            .unwrap();
        assert_eq!(first.conversation_id, "conv-1");
        assert_eq!(
            first.turns,
            vec![
                Turn { role: Role::User, text: "Hello".into() },
                Turn {
                    role: Role::Assistant,
                    text: "[Greeting Agent] Hello! How can I help?".into(),
                },
            ]
        );

        let Json(second) = get_conversation(State(state), Path("conv-2".into()))
            .await
            .unwrap();
        assert_eq!(second.turns.len(), 2);
        assert_eq!(second.turns[1].text, "[Greeting Agent] Hi again!");
    }

    #[tokio::test]
    async fn test_same_conversation_accumulates() {
        let state = state_with(CannedProvider::new([]));

        for message in ["first", "second"] {
            chat_handler(State(state.clone()), chat(message, Some("conv-1")))
                .await
                .unwrap();
        }

        let Json(history) = get_conversation(State(state), Path("conv-1".into()))
            .await
            .unwrap();
        let user_turns: Vec<_> = history
            .turns
            .iter()
            .filter(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(user_turns, vec!["first", "second"]);
        assert_eq!(history.turns.len(), 4);
    }

    #[tokio::test]
    async fn test_generated_id_is_recorded() {
        let state = state_with(CannedProvider::new([]));

        let Json(reply) = chat_handler(State(state.clone()), chat("anything", None))
            .await
            .unwrap();

        let Json(history) = get_conversation(State(state), Path(reply.conversation_id))
            .await
            .unwrap();
        assert_eq!(history.turns[0].text, "anything");
    }

    #[tokio::test]
    async fn test_rejected_message_is_not_recorded() {
        let state = state_with(CannedProvider::new([]));

        chat_handler(State(state.clone()), chat("  ", Some("conv-1")))
            .await
            .unwrap_err();

        let (status, Json(error)) = get_conversation(State(state), Path("conv-1".into()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error.code, "CONVERSATION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_forget_conversation() {
        let state = state_with(CannedProvider::new([]));
        chat_handler(State(state.clone()), chat("hello", Some("conv-1")))
            .await
            .unwrap();

        let status = forget_conversation(State(state.clone()), Path("conv-1".into()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = forget_conversation(State(state), Path("conv-1".into()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
