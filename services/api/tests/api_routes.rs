//! Router-level tests for the chart and conversation endpoints.
//!
//! Each test builds a fresh router around a scripted generative service, so no
//! network access or API key is needed.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use api_lib::config::Config;
use api_lib::web::protocol::{ReplyResponse, SystemInfo};
use api_lib::web::{router, state::AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use star_talks_core::conversation::FALLBACK_REPLY;
use star_talks_core::error::{CHART_FAILED_MESSAGE, COMMUNICATION_INTERRUPTED_MESSAGE};
use star_talks_core::{
    ConversationRequest, GenerativeService, PortError, PortResult, StructuredRequest,
};
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

#[derive(Default)]
struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    conversations: Mutex<Vec<ConversationRequest>>,
}

impl ScriptedGenerator {
    fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    fn next(&self) -> PortResult<String> {
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(PortError::Unexpected(reason)),
            None => Err(PortError::Unexpected("no scripted reply".to_string())),
        }
    }
}

#[async_trait]
impl GenerativeService for ScriptedGenerator {
    async fn generate_structured(&self, _request: &StructuredRequest) -> PortResult<String> {
        self.next()
    }

    async fn generate_from_conversation(
        &self,
        request: &ConversationRequest,
    ) -> PortResult<String> {
        self.conversations.lock().unwrap().push(request.clone());
        self.next()
    }
}

fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

fn make_app(generator: Arc<ScriptedGenerator>) -> axum::Router {
    router(Arc::new(AppState::new(&test_config(), generator)))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn ada() -> Value {
    json!({ "name": "Ada", "date": "1990-01-01", "time": "08:00", "location": "London, UK" })
}

fn vedic_reply() -> String {
    json!({
        "lagna": "Sagittarius",
        "positions": [],
        "summary": "A seeker's chart. Wisdom comes late.",
        "structuralAnalysis": "Jupiter rules the Lagna."
    })
    .to_string()
}

// =============================================================================
// GET /systems
// =============================================================================

#[tokio::test]
async fn systems_lists_all_four_traditions() {
    let app = make_app(Arc::new(ScriptedGenerator::default()));
    let resp = app
        .oneshot(Request::get("/systems").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let systems: Vec<SystemInfo> = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(systems.len(), 4);
    let chinese = systems
        .iter()
        .find(|s| s.title == "Chinese BaZi")
        .expect("chinese entry");
    assert!(!chinese.uses_lagna);
    assert!(chinese.description.contains("Five Elements"));
    assert!(systems.iter().all(|s| !s.description.is_empty()));
}

// =============================================================================
// POST /charts
// =============================================================================

#[tokio::test]
async fn chart_is_returned_with_requested_system() {
    let app = make_app(Arc::new(ScriptedGenerator::new(vec![Ok(vedic_reply())])));
    let resp = app
        .oneshot(post_json("/charts", json!({ "details": ada(), "system": "vedic" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let chart = body_json(resp).await;
    assert_eq!(chart["system"], "vedic");
    assert_eq!(chart["lagna"], "Sagittarius");
    assert!(chart["positions"].is_array());
    assert!(!chart["summary"].as_str().unwrap().is_empty());
    assert!(!chart["structuralAnalysis"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn unparseable_chart_reply_is_bad_gateway_with_generic_message() {
    let app = make_app(Arc::new(ScriptedGenerator::new(vec![Ok("not json".to_string())])));
    let resp = app
        .oneshot(post_json("/charts", json!({ "details": ada(), "system": "western" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(resp).await["error"], CHART_FAILED_MESSAGE);
}

#[tokio::test]
async fn blank_summary_is_bad_gateway_not_a_partial_chart() {
    let blank = json!({ "positions": [], "summary": "", "structuralAnalysis": "" }).to_string();
    let app = make_app(Arc::new(ScriptedGenerator::new(vec![Ok(blank)])));
    let resp = app
        .oneshot(post_json("/charts", json!({ "details": ada(), "system": "vedic" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(resp).await["error"], CHART_FAILED_MESSAGE);
}

#[tokio::test]
async fn unknown_system_is_rejected_before_any_upstream_call() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok(vedic_reply())]));
    let app = make_app(generator.clone());
    let resp = app
        .oneshot(post_json("/charts", json!({ "details": ada(), "system": "mayan" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(generator.replies.lock().unwrap().len(), 1);
}

// =============================================================================
// POST /conversations/*
// =============================================================================

#[tokio::test]
async fn reply_returns_model_text_and_forwards_history() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok(
        "Your Lagna is Sagittarius.".to_string()
    )]));
    let app = make_app(generator.clone());
    let body = json!({
        "history": [
            { "role": "user", "content": "A" },
            { "role": "model", "content": "B" },
            { "role": "user", "content": "Tell me about my Lagna" }
        ],
        "details": ada(),
        "system": "vedic"
    });

    let resp = app.oneshot(post_json("/conversations/reply", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let reply: ReplyResponse = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(reply.reply, "Your Lagna is Sagittarius.");

    let sent = generator.conversations.lock().unwrap();
    let contents: Vec<&str> = sent[0].contents.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["A", "B", "Tell me about my Lagna"]);
    assert!(sent[0].system_instruction.contains("No chart generated yet"));
}

#[tokio::test]
async fn configured_window_shapes_the_forwarded_history() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok("Noted.".to_string())]));
    let config = Config::from_lookup(|name| (name == "HISTORY_WINDOW").then(|| "1".to_string()))
        .unwrap();
    let app = router(Arc::new(AppState::new(&config, generator.clone())));
    let body = json!({
        "history": [
            { "role": "user", "content": "A" },
            { "role": "model", "content": "B" },
            { "role": "user", "content": "C" }
        ],
        "details": ada(),
        "system": "chinese"
    });

    let resp = app.oneshot(post_json("/conversations/reply", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let sent = generator.conversations.lock().unwrap();
    let contents: Vec<&str> = sent[0].contents.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["C"]);
}

#[tokio::test]
async fn empty_reply_is_replaced_by_fallback() {
    let app = make_app(Arc::new(ScriptedGenerator::new(vec![Ok(String::new())])));
    let body = json!({
        "history": [{ "role": "user", "content": "Hello" }],
        "details": ada(),
        "system": "western"
    });

    let resp = app.oneshot(post_json("/conversations/reply", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["reply"], FALLBACK_REPLY);
}

#[tokio::test]
async fn upstream_failure_is_communication_interrupted() {
    let app = make_app(Arc::new(ScriptedGenerator::new(vec![Err(
        "429 Too Many Requests".to_string()
    )])));
    let body = json!({
        "history": [{ "role": "user", "content": "Hello" }],
        "details": ada(),
        "system": "hellenistic"
    });

    let resp = app.oneshot(post_json("/conversations/reply", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let error = body_json(resp).await;
    assert_eq!(error["error"], COMMUNICATION_INTERRUPTED_MESSAGE);
    assert!(!error.to_string().contains("429"));
}

#[tokio::test]
async fn opening_uses_the_supplied_chart() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok("Welcome, Ada.".to_string())]));
    let app = make_app(generator.clone());
    let chart: Value = serde_json::from_str(&vedic_reply()).unwrap();
    let mut chart = chart.as_object().unwrap().clone();
    chart.insert("system".to_string(), json!("vedic"));

    let body = json!({ "chart": chart, "details": ada(), "system": "vedic" });
    let resp = app
        .oneshot(post_json("/conversations/opening", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["reply"], "Welcome, Ada.");

    let sent = generator.conversations.lock().unwrap();
    assert_eq!(sent[0].contents.len(), 1);
    assert!(sent[0].system_instruction.contains("Sagittarius"));
}
