//! REST endpoints for the chat API.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::assistant::ChatAssistant;
use crate::onboarding::Grade;

/// Shared state for chat routes.
#[derive(Clone)]
pub struct ChatRouteState {
    pub assistant: Arc<ChatAssistant>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// A number or numeric string; validated by [`parse_user_grade`].
    #[serde(default, rename = "userGrade")]
    pub user_grade: Option<Value>,
}

/// Read `userGrade` as sent by browser clients.
///
/// Integers, integral floats and numeric strings in 1-6 are accepted.
/// Anything else is `None`.
pub fn parse_user_grade(value: &Value) -> Option<Grade> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number.fract() != 0.0 {
        return None;
    }
    Grade::new(number as i64).ok()
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "brainbot"
    }))
}

/// POST /api/chat
///
/// Returns `{"response": ...}` for a message and a grade in 1-6. Unlike the
/// conversational flow, a model failure here is reported as a 500 so the
/// client can show its own fallback.
async fn chat(
    State(state): State<ChatRouteState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected chat request body");
            return error_response(rejection.status(), "Invalid request body.");
        }
    };

    let message = match body.message {
        Some(m) if !m.trim().is_empty() => m,
        _ => return error_response(StatusCode::BAD_REQUEST, "A message is required."),
    };

    let grade = match body.user_grade.as_ref().and_then(parse_user_grade) {
        Some(grade) => grade,
        None => return error_response(StatusCode::BAD_REQUEST, "A valid grade (1-6) is required."),
    };

    match state.assistant.generate_reply(grade, &message).await {
        Ok(response) => {
            info!(grade = %grade, "Chat reply sent");
            Json(serde_json::json!({ "response": response })).into_response()
        }
        Err(e) => {
            warn!(grade = %grade, error = %e, "Chat API reply failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate a chat response.",
            )
        }
    }
}

/// Build the chat REST routes.
pub fn chat_routes(assistant: Arc<ChatAssistant>) -> Router {
    let state = ChatRouteState { assistant };

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
