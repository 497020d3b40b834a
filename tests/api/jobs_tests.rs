//! Background Job Serve Endpoint Tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use chat_backend::domain::jobs::JobsConfig;
use chat_backend::infrastructure::jobs::serve::SIGNATURE_HEADER;
use chat_backend::presentation::middleware::SessionAuth;

use crate::common::*;

async fn app_with_signing_key(signing_key: &str) -> TestApp {
    let assets = static_dir();
    let settings = test_settings(&assets);
    let config = JobsConfig {
        client: Some(job_client()),
        functions: Some(vec![echo_function("echo")]),
    };
    let integrations = integrations(
        &settings,
        Arc::new(SessionAuth::new(settings.auth.secret_key.clone())),
        connected_store(),
        jobs_resolving(config, signing_key),
    );
    TestApp::build(settings, integrations, assets).await.unwrap()
}

fn invoke(fn_id: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/inngest?fnId={fn_id}"))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder
        .body(Body::from(json!({"event": {"data": {"id": "user_1"}}}).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_introspection_lists_functions() {
    let app = TestApp::healthy().await;

    let response = app.get("/api/inngest").await;

    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["app_id"], "chat-backend");
    assert_eq!(body["function_count"], 1);
    assert_eq!(body["functions"][0]["id"], "echo");
}

#[tokio::test]
async fn test_sync_acknowledges_functions() {
    let app = TestApp::healthy().await;

    let response = app.send("PUT", "/api/inngest").await;

    assert_status(&response, StatusCode::OK);
    assert_eq!(body_json(response).await["function_count"], 1);
}

#[tokio::test]
async fn test_invoke_runs_function() {
    let app = TestApp::healthy().await;

    let response = app.request(invoke("echo", None)).await;

    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["fnId"], "echo");
    assert_eq!(body["result"]["data"]["id"], "user_1");
}

#[tokio::test]
async fn test_invoke_unknown_function_is_not_found() {
    let app = TestApp::healthy().await;

    let response = app.request(invoke("missing", None)).await;

    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invoke_checks_signing_key() {
    let app = app_with_signing_key("signkey-test").await;

    let unsigned = app.request(invoke("echo", None)).await;
    assert_status(&unsigned, StatusCode::UNAUTHORIZED);

    let wrong = app.request(invoke("echo", Some("nope"))).await;
    assert_status(&wrong, StatusCode::UNAUTHORIZED);

    let signed = app.request(invoke("echo", Some("signkey-test"))).await;
    assert_status(&signed, StatusCode::OK);
}
