use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use qasum::clipboard::{Clipboard, ClipboardError};
use qasum::config::{ApiConfig, Config};
use qasum::controller::{FETCH_FAILED, MAX_CHARS, UNEXPECTED_RESPONSE};
use qasum::{InferenceClient, SummaryRequestController};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// What the mock endpoint saw on its last request.
#[derive(Default)]
struct Seen {
    authorization: Option<String>,
    content_type: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    seen: Arc<Mutex<Seen>>,
    status: StatusCode,
    reply: String,
}

#[derive(Default)]
struct RecordingClipboard(Vec<String>);

impl Clipboard for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.push(text.to_string());
        Ok(())
    }
}

async fn mock_model(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let mut seen = state.seen.lock().unwrap();
    seen.authorization = header("authorization");
    seen.content_type = header("content-type");
    seen.body = Some(body);

    (state.status, state.reply.clone())
}

async fn spawn_mock_model(status: StatusCode, reply: &str) -> (String, Arc<Mutex<Seen>>) {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let app = Router::new()
        .route("/models/bart", post(mock_model))
        .with_state(MockState {
            seen: seen.clone(),
            status,
            reply: reply.to_string(),
        });

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/models/bart", addr), seen)
}

fn client_for(endpoint: &str) -> InferenceClient {
    let config = Config {
        api: ApiConfig {
            endpoint: endpoint.to_string(),
            key: Some("hf_test_key".to_string()),
            timeout_secs: Some(5),
        },
    };
    InferenceClient::new(&config).unwrap()
}

#[tokio::test]
async fn e2e_summary_is_copied_and_request_is_well_formed() {
    let (endpoint, seen) =
        spawn_mock_model(StatusCode::OK, r#"[{"summary_text":"A short answer."}]"#).await;
    let client = client_for(&endpoint);
    let mut form = SummaryRequestController::new(RecordingClipboard::default());
    form.set_question("x".repeat(MAX_CHARS + 10));

    assert!(form.submit(&client).await);

    assert_eq!(form.answer(), "A short answer.");
    assert_eq!(form.error(), "");
    assert!(!form.is_loading());
    assert_eq!(form.clipboard().0, vec!["A short answer."]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer hf_test_key"));
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        seen.body.as_ref().unwrap(),
        &json!({ "inputs": "x".repeat(MAX_CHARS) })
    );
}

#[tokio::test]
async fn e2e_api_error_on_non_2xx_status_is_shown_verbatim() {
    let (endpoint, _) = spawn_mock_model(
        StatusCode::SERVICE_UNAVAILABLE,
        r#"{"error":"Model facebook/bart-large-cnn is currently loading","estimated_time":20.0}"#,
    )
    .await;
    let client = client_for(&endpoint);
    let mut form = SummaryRequestController::new(RecordingClipboard::default());
    form.set_question("hello");

    form.submit(&client).await;

    assert_eq!(
        form.error(),
        "Model facebook/bart-large-cnn is currently loading"
    );
    assert_eq!(form.answer(), "");
    assert!(form.clipboard().0.is_empty());
}

#[tokio::test]
async fn e2e_empty_object_is_unexpected() {
    let (endpoint, _) = spawn_mock_model(StatusCode::OK, "{}").await;
    let client = client_for(&endpoint);
    let mut form = SummaryRequestController::new(RecordingClipboard::default());
    form.set_question("hello");

    form.submit(&client).await;

    assert_eq!(form.error(), UNEXPECTED_RESPONSE);
}

#[tokio::test]
async fn e2e_non_json_body_asks_for_retry() {
    let (endpoint, _) = spawn_mock_model(StatusCode::BAD_GATEWAY, "<html>gateway</html>").await;
    let client = client_for(&endpoint);
    let mut form = SummaryRequestController::new(RecordingClipboard::default());
    form.set_question("hello");

    form.submit(&client).await;

    assert_eq!(form.error(), FETCH_FAILED);
    assert!(!form.is_loading());
}

#[tokio::test]
async fn e2e_unreachable_endpoint_asks_for_retry() {
    let client = client_for("http://127.0.0.1:1/models/bart");
    let mut form = SummaryRequestController::new(RecordingClipboard::default());
    form.set_question("hello");

    form.submit(&client).await;

    assert_eq!(form.error(), FETCH_FAILED);
    assert!(!form.is_loading());
}

#[tokio::test]
async fn e2e_empty_question_sends_nothing() {
    let (endpoint, seen) = spawn_mock_model(StatusCode::OK, "[]").await;
    let client = client_for(&endpoint);
    let mut form = SummaryRequestController::new(RecordingClipboard::default());

    assert!(!form.submit(&client).await);
    assert!(seen.lock().unwrap().body.is_none());
}

#[test]
fn client_requires_api_key() {
    let config = Config::default();
    assert!(InferenceClient::new(&config).is_err());
}
