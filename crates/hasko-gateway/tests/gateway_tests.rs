// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests over a `TestHarness`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use hasko_gateway::{GatewayState, build_router};
use hasko_test_utils::{MockChunk, MockInference, TEST_MODEL, TestHarness};
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:5173";

fn router(harness: &TestHarness) -> Router {
    let state = GatewayState {
        handler: harness.handler.clone(),
        inference: harness.inference.clone(),
    };
    build_router(state, &[ORIGIN.to_string()])
}

fn send_message(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/send-message")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn root_reports_liveness() {
    let harness = TestHarness::new().unwrap();
    let response = router(&harness)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        r#"{"message":"Hasko backend is running."}"#
    );
}

#[tokio::test]
async fn models_lists_installed_names() {
    let harness = TestHarness::builder()
        .with_inference(MockInference::new().with_installed(&["llama3:latest", "mistral:7b"]))
        .build()
        .unwrap();
    let response = router(&harness)
        .oneshot(Request::get("/models").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["models"], serde_json::json!(["llama3:latest", "mistral:7b"]));
}

#[tokio::test]
async fn models_failure_is_a_500_with_detail() {
    let harness = TestHarness::builder()
        .with_inference(MockInference::new().failing_list())
        .build()
        .unwrap();
    let response = router(&harness)
        .oneshot(Request::get("/models").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        r#"{"detail":"Failed to retrieve models from Ollama API."}"#
    );
}

#[tokio::test]
async fn send_message_streams_plain_text() {
    let harness = TestHarness::builder()
        .with_inference(
            MockInference::new()
                .with_running(&[TEST_MODEL])
                .with_fragments(&["Hel", "lo", "!"]),
        )
        .build()
        .unwrap();

    let response = router(&harness)
        .oneshot(send_message(serde_json::json!({
            "content": "say hello",
            "model": "",
            "history": [{"isUser": true, "text": "earlier"}],
            "chat_id": 5
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert_eq!(body_text(response).await, "Hello!");

    let history = harness.record("5").await.conversation_history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, "Hello!");
}

#[tokio::test]
async fn mixed_history_shapes_are_accepted() {
    let harness = TestHarness::builder()
        .with_inference(
            MockInference::new()
                .with_running(&[TEST_MODEL])
                .with_fragments(&["fine"]),
        )
        .build()
        .unwrap();

    let response = router(&harness)
        .oneshot(send_message(serde_json::json!({
            "content": "how are you",
            "history": [
                {"isUser": true, "content": "hello"},
                {"role": "assistant", "text": "hi"},
                {"unexpected": 1}
            ],
            "chat_id": 9
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "fine");
}

#[tokio::test]
async fn canned_replies_use_the_same_body_shape() {
    let harness = TestHarness::new().unwrap();
    let app = router(&harness);

    let response = app
        .clone()
        .oneshot(send_message(serde_json::json!({
            "content": "My name is Alice",
            "model": TEST_MODEL,
            "history": [],
            "chat_id": 1
        })))
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Got it, Alice!");

    let response = app
        .oneshot(send_message(serde_json::json!({
            "content": "what is my name",
            "model": TEST_MODEL,
            "history": [],
            "chat_id": 1
        })))
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Your name is Alice.");
}

#[tokio::test]
async fn unavailable_model_is_a_500_with_detail() {
    let harness = TestHarness::builder()
        .with_inference(MockInference::new().never_loads())
        .build()
        .unwrap();

    let response = router(&harness)
        .oneshot(send_message(serde_json::json!({
            "content": "hi",
            "model": "ghost",
            "history": [],
            "chat_id": 1
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        r#"{"detail":"Failed to start or connect to model 'ghost'"}"#
    );
}

#[tokio::test]
async fn mid_stream_failure_still_completes_the_body() {
    let harness = TestHarness::builder()
        .with_inference(MockInference::new().with_running(&[TEST_MODEL]).with_script(vec![
            MockChunk::text("partial "),
            MockChunk::TransportError("reset".into()),
        ]))
        .build()
        .unwrap();

    let response = router(&harness)
        .oneshot(send_message(serde_json::json!({
            "content": "hi",
            "model": "",
            "history": [],
            "chat_id": 1
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "partial I encountered an error while processing your request."
    );
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let harness = TestHarness::new().unwrap();
    let response = router(&harness)
        .oneshot(send_message(serde_json::json!({ "content": "hi" })))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_with_credentials() {
    let harness = TestHarness::new().unwrap();
    let response = router(&harness)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/send-message")
                .header(header::ORIGIN, ORIGIN)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn cors_rejects_unlisted_origin() {
    let harness = TestHarness::new().unwrap();
    let response = router(&harness)
        .oneshot(
            Request::get("/")
                .header(header::ORIGIN, "http://evil.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn wildcard_origin_allows_any_without_credentials() {
    let harness = TestHarness::new().unwrap();
    let state = GatewayState {
        handler: harness.handler.clone(),
        inference: harness.inference.clone(),
    };
    let response = build_router(state, &["*".to_string()])
        .oneshot(
            Request::get("/")
                .header(header::ORIGIN, "http://anywhere.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
}
