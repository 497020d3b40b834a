//! Chat Handlers

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use crate::presentation::http::routes::ChatState;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;

/// Claims of a chat client token.
#[derive(Debug, Serialize)]
struct ChatClaims<'a> {
    user_id: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize)]
pub struct ChatTokenResponse {
    pub token: String,
    pub api_key: String,
    pub user_id: String,
}

/// Issue a chat client token for the signed-in user.
pub async fn get_chat_token(
    State(state): State<ChatState>,
    auth: AuthUser,
) -> Result<Json<ChatTokenResponse>, AppError> {
    let now = Utc::now();
    let claims = ChatClaims {
        user_id: &auth.user_id,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(state.settings.token_ttl_minutes)).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.settings.api_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to sign chat token: {e}")))?;

    Ok(Json(ChatTokenResponse {
        token,
        api_key: state.settings.api_key.clone(),
        user_id: auth.user_id,
    }))
}
