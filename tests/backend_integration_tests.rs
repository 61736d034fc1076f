use std::sync::Arc;

use dialogix::backend::{
    AnalysisRequest, BackendError, ChatRequest, HttpBackend, PersonaBackend, spawn_turn,
};
use dialogix::core::action::{Action, Effect, update};
use dialogix::core::persona;
use dialogix::core::state::{FALLBACK_REPLY, Phase, Session};
use dialogix::core::upload::PendingFile;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Both services on one mock server; their paths don't overlap.
fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(server.uri(), server.uri())
}

fn chat_request(message: &str) -> ChatRequest {
    ChatRequest {
        user_message: message.to_string(),
        conversation_history: vec![],
        document_context: None,
    }
}

async fn mount_reply(server: &MockServer, persona_id: &str, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/api/personas/{persona_id}/chat")))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_analysis(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/nlp/analyze"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn sample_analysis() -> Value {
    json!({
        "sentiment": {"negative": 0.0, "neutral": 0.4, "positive": 0.6, "compound": 0.42},
        "entities": [{"text": "Paris", "label": "GPE", "start": 10, "end": 15}],
        "intents": {"greeting": 0.8, "question": 0.1}
    })
}

/// Apply `action`, spawn the resulting turn (if any) and apply every result.
async fn run_turn(session: &mut Session, backend: Arc<dyn PersonaBackend>, action: Action) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    match update(session, action) {
        Effect::SpawnTurn(turn) => {
            spawn_turn(backend, turn, tx);
        }
        _ => drop(tx),
    }
    while let Some(result) = rx.recv().await {
        update(session, result);
    }
}

async fn request_body(server: &MockServer, url_path: &str) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    let request = requests
        .iter()
        .find(|r| r.url.path() == url_path)
        .expect("request was sent");
    serde_json::from_slice(&request.body).expect("json body")
}

// ============================================================================
// HttpBackend
// ============================================================================

#[tokio::test]
async fn test_reply_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/personas/captain/chat"))
        .and(body_partial_json(json!({"user_message": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hi"})))
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .reply("captain", &chat_request("hello"))
        .await
        .unwrap();
    assert_eq!(reply, "hi");
}

#[tokio::test]
async fn test_reply_non_2xx_is_api_error() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        "zen",
        ResponseTemplate::new(500).set_body_string("boom"),
    )
    .await;

    let result = backend_for(&server).reply("zen", &chat_request("hello")).await;
    match result {
        Err(BackendError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reply_without_response_field_is_parse_error() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        "dev",
        ResponseTemplate::new(200).set_body_json(json!({"message": "wrong shape"})),
    )
    .await;

    let result = backend_for(&server).reply("dev", &chat_request("hello")).await;
    assert!(matches!(result, Err(BackendError::Parse(_))));
}

#[tokio::test]
async fn test_analysis_success() {
    let server = MockServer::start().await;
    mount_analysis(&server, ResponseTemplate::new(200).set_body_json(sample_analysis())).await;

    let analysis = backend_for(&server)
        .analyze(&AnalysisRequest {
            text: "hello from Paris".to_string(),
            document: None,
        })
        .await
        .unwrap();

    let sentiment = analysis.sentiment.as_ref().expect("sentiment present");
    assert_eq!(sentiment.compound, 0.42);
    assert_eq!(analysis.entities[0].text, "Paris");
    assert_eq!(analysis.top_intents(4)[0].0, "greeting");
}

#[tokio::test]
async fn test_analysis_tolerates_partial_body() {
    let server = MockServer::start().await;
    mount_analysis(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "sentiment": {"compound": null},
            "intents": {"ask": "high"}
        })),
    )
    .await;

    let analysis = backend_for(&server)
        .analyze(&AnalysisRequest {
            text: "hm".to_string(),
            document: None,
        })
        .await
        .unwrap();
    assert_eq!(analysis.sentiment.map(|s| s.compound), Some(0.0));
    assert!(analysis.entities.is_empty());
}

#[tokio::test]
async fn test_analysis_non_json_is_parse_error() {
    let server = MockServer::start().await;
    mount_analysis(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

    let result = backend_for(&server)
        .analyze(&AnalysisRequest {
            text: "hm".to_string(),
            document: None,
        })
        .await;
    assert!(matches!(result, Err(BackendError::Parse(_))));
}

#[tokio::test]
async fn test_health_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Persona Chat API",
            "status": "online"
        })))
        .mount(&server)
        .await;

    let health = backend_for(&server).health().await.unwrap();
    assert_eq!(health.status, "online");
    assert_eq!(health.message, "Persona Chat API");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 1
    let backend = HttpBackend::new("http://127.0.0.1:1", "http://127.0.0.1:1");
    let result = backend.reply("zen", &chat_request("hello")).await;
    assert!(matches!(result, Err(BackendError::Network(_))));
}

// ============================================================================
// Full turns through the reducer
// ============================================================================

#[tokio::test]
async fn test_turn_success_appends_reply_and_analysis() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        "captain",
        ResponseTemplate::new(200).set_body_json(json!({"response": "hi"})),
    )
    .await;
    mount_analysis(&server, ResponseTemplate::new(200).set_body_json(sample_analysis())).await;

    let mut session = Session::new(persona::get("captain"));
    run_turn(
        &mut session,
        Arc::new(backend_for(&server)),
        Action::SubmitText("hello".to_string()),
    )
    .await;

    assert_eq!(session.phase, Phase::Idle);
    assert!(!session.is_typing);
    assert_eq!(session.messages.len(), 3);
    assert_eq!(session.messages[1].content, "hello");
    assert_eq!(session.messages[2].content, "hi");
    assert!(session.messages[1].analysis.is_some());
    assert!(session.last_analysis.is_some());

    let body = request_body(&server, "/api/personas/captain/chat").await;
    assert_eq!(body["conversation_history"][0]["sender"], "ai");
    assert_eq!(
        body["conversation_history"][0]["message"],
        persona::welcome_message("captain")
    );
}

#[tokio::test]
async fn test_turn_reply_failure_uses_fallback() {
    let server = MockServer::start().await;
    mount_reply(&server, "zen", ResponseTemplate::new(503)).await;
    mount_analysis(&server, ResponseTemplate::new(200).set_body_json(sample_analysis())).await;

    let mut session = Session::new(persona::get("zen"));
    run_turn(
        &mut session,
        Arc::new(backend_for(&server)),
        Action::SubmitText("hello".to_string()),
    )
    .await;

    assert_eq!(session.phase, Phase::Idle);
    assert_eq!(session.messages.len(), 3);
    assert_eq!(session.messages[2].content, FALLBACK_REPLY);
    // Analysis is independent of the reply
    assert!(session.messages[1].analysis.is_some());
}

#[tokio::test]
async fn test_turn_analysis_failure_still_replies() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        "dev",
        ResponseTemplate::new(200).set_body_json(json!({"response": "shipping it"})),
    )
    .await;
    mount_analysis(&server, ResponseTemplate::new(500)).await;

    let mut session = Session::new(persona::get("dev"));
    run_turn(
        &mut session,
        Arc::new(backend_for(&server)),
        Action::SubmitText("hello".to_string()),
    )
    .await;

    assert_eq!(session.messages[2].content, "shipping it");
    assert!(session.messages[1].analysis.is_none());
    assert!(session.last_analysis.is_none());
}

#[tokio::test]
async fn test_file_upload_turn() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        "professor",
        ResponseTemplate::new(200).set_body_json(json!({
            "response": "I've received your file \"notes.txt\". What would you like me to do with it?"
        })),
    )
    .await;
    mount_analysis(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "sentiment": {"compound": 0.0},
            "document_summary": "Three letters."
        })),
    )
    .await;

    let mut session = Session::new(persona::get("professor"));
    update(&mut session, Action::StageFile(PendingFile::new("notes.txt", "abc")));
    run_turn(&mut session, Arc::new(backend_for(&server)), Action::SubmitFile).await;

    assert_eq!(session.messages[1].content, "Uploaded file: notes.txt");
    assert!(session.messages[2].content.contains("notes.txt"));
    assert!(session.pending_file.is_none());
    assert_eq!(
        session
            .last_analysis
            .as_ref()
            .and_then(|a| a.document_summary.as_deref()),
        Some("Three letters.")
    );

    let chat = request_body(&server, "/api/personas/professor/chat").await;
    assert_eq!(chat["user_message"], "Please analyze this file: notes.txt");
    assert_eq!(chat["document_context"], "abc");
    let analysis = request_body(&server, "/api/nlp/analyze").await;
    assert_eq!(analysis["document"], "abc");
}

#[tokio::test]
async fn test_blank_submit_sends_nothing() {
    let server = MockServer::start().await;

    let mut session = Session::new(persona::get("poet"));
    run_turn(
        &mut session,
        Arc::new(backend_for(&server)),
        Action::SubmitText("   ".to_string()),
    )
    .await;

    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.phase, Phase::Idle);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
