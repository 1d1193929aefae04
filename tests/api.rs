//! HTTP surface exercised through the router without binding a socket

use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::Value;
use tower::ServiceExt;

use countdown_pad::{api::create_router, state::AppState, tasks::countdown_driver_task};

fn app_with_state() -> (Router, Arc<AppState>) {
    let (state, events) = AppState::new(20554, "127.0.0.1".to_string(), 1000);
    let state = Arc::new(state);
    tokio::spawn(countdown_driver_task(Arc::clone(&state), events));
    (create_router(Arc::clone(&state)), state)
}

fn app() -> Router {
    app_with_state().0
}

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn digits_build_the_duration() {
    let app = app();
    for d in ["1", "3", "0", "5", "0", "5"] {
        let (status, _) = call(&app, "POST", &format!("/digit/{}", d)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app, "GET", "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clock"], "13:05:05");
    assert_eq!(body["timer"]["duration_ms"], 47_105_000);
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["last_action"], "digit");
}

#[tokio::test]
async fn bad_digits_are_rejected() {
    let app = app();
    let (status, body) = call(&app, "POST", "/digit/12").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = call(&app, "POST", "/digit/x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "not a digit: 'x'");

    // too wide for a u8, but every character is a digit
    let (status, body) = call(&app, "POST", "/digit/256").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("invalid digit"));

    let (_, body) = call(&app, "GET", "/status").await;
    assert_eq!(body["timer"]["digits"], "");
}

#[tokio::test]
async fn intents_report_applied_or_ignored() {
    let app = app();
    let (_, body) = call(&app, "POST", "/start").await;
    assert_eq!(body["status"], "ignored");

    call(&app, "POST", "/digit/9").await;
    let (_, body) = call(&app, "POST", "/start").await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["started"], true);

    let (_, body) = call(&app, "POST", "/resume").await;
    assert_eq!(body["status"], "ignored");

    let (_, body) = call(&app, "POST", "/pause").await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["paused"], true);

    let (_, body) = call(&app, "POST", "/restart").await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["remaining_ms"], 9_000);
    assert_eq!(body["timer"]["paused"], false);
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = call(&app(), "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn events_stream_each_snapshot() {
    let (app, state) = app_with_state();
    let request = Request::builder()
        .uri("/events")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let mut frames = response.into_body().into_data_stream();
    let first = frames.next().await.expect("first frame").expect("bytes");
    let first = String::from_utf8_lossy(&first).to_string();
    assert!(first.contains("event: snapshot"), "{}", first);
    assert!(first.contains("\"phase\":\"idle\""), "{}", first);
    assert!(first.contains("\"digits\":\"\""), "{}", first);

    state.add_digit(2).expect("digit");
    let second = frames.next().await.expect("second frame").expect("bytes");
    let second = String::from_utf8_lossy(&second).to_string();
    assert!(second.contains("event: snapshot"), "{}", second);
    assert!(second.contains("\"seconds\":\"02\""), "{}", second);
    assert!(second.contains("\"digits\":\"2\""), "{}", second);
}
