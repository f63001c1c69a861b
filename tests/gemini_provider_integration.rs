//! Integration tests for the Gemini provider against a local stand-in server.
//!
//! The stand-in speaks the `generateContent` wire format, records every
//! request it receives, and answers with a canned status and body.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use brainbot::assistant::ChatAssistant;
use brainbot::config::GenerationConfig;
use brainbot::conversation::Conversation;
use brainbot::error::LlmError;
use brainbot::llm::{
    ChatMessage, CompletionRequest, FinishReason, GeminiProvider, LlmBackend, LlmConfig,
    LlmProvider, create_provider,
};
use brainbot::onboarding::{ConversationPhase, FALLBACK_MESSAGE, Grade, system_instruction};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);
const MODEL: &str = "gemini-test";

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    body: Value,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

async fn generate_content(
    State(fake): State<FakeGemini>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    fake.requests.lock().unwrap().push(Recorded {
        path: call,
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });
    (fake.status, Json(fake.body.clone()))
}

/// Start a stand-in Gemini server; returns its base URL and request log.
async fn start_fake(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeGemini {
        status,
        body,
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/models/{call}", post(generate_content))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}/models"), requests)
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}
        ],
        "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 9}
    })
}

fn provider(base_url: &str) -> GeminiProvider {
    GeminiProvider::new(SecretString::from("test-key"), MODEL).with_base_url(base_url)
}

#[tokio::test]
async fn complete_sends_wire_format_and_parses_reply() {
    timeout(TEST_TIMEOUT, async {
        let (base_url, requests) =
            start_fake(StatusCode::OK, text_reply("Try saying it out loud!")).await;

        let request = CompletionRequest::new(vec![
            ChatMessage::system("persona"),
            ChatMessage::user("How do I remember spelling words?"),
        ])
        .with_max_tokens(200)
        .with_temperature(0.7);

        let response = provider(&base_url).complete(request).await.unwrap();
        assert_eq!(response.content, "Try saying it out loud!");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.input_tokens, 40);
        assert_eq!(response.output_tokens, 9);

        let recorded = requests.lock().unwrap().clone();
        assert_eq!(recorded.len(), 1);
        let req = &recorded[0];
        assert_eq!(req.path, "gemini-test:generateContent");
        assert_eq!(req.api_key.as_deref(), Some("test-key"));
        assert_eq!(req.body["systemInstruction"]["parts"][0]["text"], "persona");
        assert_eq!(req.body["contents"][0]["role"], "user");
        assert_eq!(
            req.body["contents"][0]["parts"][0]["text"],
            "How do I remember spelling words?"
        );
        assert_eq!(req.body["generationConfig"]["maxOutputTokens"], 200);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn error_statuses_map_to_llm_errors() {
    timeout(TEST_TIMEOUT, async {
        let error_body = json!({
            "error": {"code": 403, "message": "API key invalid", "status": "PERMISSION_DENIED"}
        });
        let (base_url, _) = start_fake(StatusCode::FORBIDDEN, error_body).await;
        let result = provider(&base_url)
            .complete(CompletionRequest::new(vec![ChatMessage::user("hi")]))
            .await;
        assert!(matches!(result, Err(LlmError::AuthFailed { .. })));

        let error_body = json!({
            "error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}
        });
        let (base_url, _) = start_fake(StatusCode::SERVICE_UNAVAILABLE, error_body).await;
        let result = provider(&base_url)
            .complete(CompletionRequest::new(vec![ChatMessage::user("hi")]))
            .await;
        match result {
            Err(LlmError::RequestFailed { reason, .. }) => {
                assert!(reason.contains("503"));
                assert!(reason.contains("overloaded"));
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn malformed_payload_is_invalid_response() {
    timeout(TEST_TIMEOUT, async {
        let (base_url, _) = start_fake(StatusCode::OK, json!({"candidates": "nope"})).await;
        let result = provider(&base_url)
            .complete(CompletionRequest::new(vec![ChatMessage::user("hi")]))
            .await;
        assert!(matches!(result, Err(LlmError::InvalidResponse { .. })));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_server_is_request_failure() {
    timeout(TEST_TIMEOUT, async {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = provider(&format!("http://127.0.0.1:{port}/models"))
            .complete(CompletionRequest::new(vec![ChatMessage::user("hi")]))
            .await;
        assert!(matches!(result, Err(LlmError::RequestFailed { .. })));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn conversation_end_to_end_through_gemini() {
    timeout(TEST_TIMEOUT, async {
        let (base_url, requests) =
            start_fake(StatusCode::OK, text_reply("Good thinking! 😊")).await;

        let llm = create_provider(&LlmConfig {
            backend: LlmBackend::Gemini,
            api_key: SecretString::from("test-key"),
            model: MODEL.to_string(),
            base_url: Some(base_url),
        })
        .unwrap();
        let assistant = ChatAssistant::new(llm, GenerationConfig::default());

        let (conversation, _) = assistant.submit(Conversation::greeted(), "hi!").await;
        let (conversation, _) = assistant.submit(conversation, "I'm in 1st grade").await;
        assert!(requests.lock().unwrap().is_empty());

        let (conversation, reply) = assistant.submit(conversation, "I like cats").await;
        assert_eq!(reply.text, "Good thinking! 😊");
        assert_eq!(conversation.phase(), ConversationPhase::Active);

        let recorded = requests.lock().unwrap().clone();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].body["systemInstruction"]["parts"][0]["text"],
            system_instruction(Grade::new(1).unwrap())
        );
        assert_eq!(recorded[0].body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(recorded[0].body["contents"][0]["parts"][0]["text"], "I like cats");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn gemini_outage_yields_fallback_and_conversation_recovers() {
    timeout(TEST_TIMEOUT, async {
        let (down_url, _) = start_fake(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
        let down = ChatAssistant::new(Arc::new(provider(&down_url)), GenerationConfig::default());

        let conversation = Conversation::new().with_grade(Grade::new(4).unwrap());
        let (conversation, reply) = down.submit(conversation, "what is focus?").await;
        assert_eq!(reply.text, FALLBACK_MESSAGE);
        assert_eq!(conversation.phase(), ConversationPhase::Active);

        // The same conversation keeps working once the service is back.
        let (up_url, _) = start_fake(StatusCode::OK, text_reply("Focus means...")).await;
        let up = ChatAssistant::new(Arc::new(provider(&up_url)), GenerationConfig::default());
        let (conversation, reply) = up.submit(conversation, "what is focus?").await;
        assert_eq!(reply.text, "Focus means...");
        assert_eq!(conversation.history().len(), 4);
    })
    .await
    .expect("test timed out");
}
