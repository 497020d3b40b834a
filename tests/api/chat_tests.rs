//! Chat API Tests

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

use crate::common::*;

#[derive(Debug, Deserialize)]
struct ChatClaims {
    user_id: String,
}

#[tokio::test]
async fn test_chat_token_requires_session() {
    let app = TestApp::healthy().await;

    let response = app.get("/api/chat/token").await;

    assert_status(&response, StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], 10003);
}

#[tokio::test]
async fn test_chat_token_rejects_invalid_session() {
    let app = TestApp::healthy().await;

    let response = app.get_auth("/api/chat/token", "not-a-token").await;

    assert_status(&response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chat_token_issued_for_bearer_session() {
    let app = TestApp::healthy().await;
    let token = app.session_token("user_42");

    let response = app.get_auth("/api/chat/token", &token).await;

    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user_id"], "user_42");
    assert_eq!(body["api_key"], app.settings.chat.api_key.as_str());

    let chat_token = body["token"].as_str().unwrap();
    let claims = decode::<ChatClaims>(
        chat_token,
        &DecodingKey::from_secret(app.settings.chat.api_secret.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;
    assert_eq!(claims.user_id, "user_42");
}

#[tokio::test]
async fn test_chat_token_issued_for_session_cookie() {
    let app = TestApp::healthy().await;
    let token = app.session_token("user_cookie");

    let response = app
        .request(
            Request::builder()
                .uri("/api/chat/token")
                .header(header::COOKIE, format!("theme=dark; __session={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_status(&response, StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user_id"], "user_cookie");
}
