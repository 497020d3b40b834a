//! Authentication Middleware
//!
//! Session token verification. The middleware never rejects a request: it
//! only attaches [`AuthUser`] when a valid token is present. Routes that need
//! a signed-in caller extract `AuthUser`, which answers 401 when missing.

use std::sync::Arc;

use anyhow::ensure;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::MIN_AUTH_SECRET_LENGTH;
use crate::domain::ports::{AuthProvider, Middleware};
use crate::shared::error::AppError;

/// Cookie carrying the session token for browser requests.
pub const SESSION_COOKIE: &str = "__session";

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Authenticated user extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))
    }
}

/// Verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        ensure!(
            secret.len() >= MIN_AUTH_SECRET_LENGTH,
            "auth secret must be at least {} characters, got {}",
            MIN_AUTH_SECRET_LENGTH,
            secret.len()
        );

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        })
    }

    pub fn verify(&self, token: &str) -> Option<AuthUser> {
        let data = decode::<Claims>(token, &self.key, &self.validation).ok()?;
        if data.claims.sub.is_empty() {
            return None;
        }
        Some(AuthUser {
            user_id: data.claims.sub,
        })
    }
}

/// Attach the caller's identity from the bearer header or session cookie.
pub async fn session_middleware(
    State(verifier): State<Arc<SessionVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    let token = bearer.or_else(|| {
        CookieJar::from_headers(request.headers())
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
    });

    if let Some(user) = token.as_deref().and_then(|t| verifier.verify(t)) {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

/// Default [`AuthProvider`] backed by a shared HMAC secret.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    secret: String,
}

impl SessionAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AuthProvider for SessionAuth {
    fn middleware(&self) -> anyhow::Result<Middleware> {
        let verifier = Arc::new(SessionVerifier::new(&self.secret)?);
        Ok(Middleware::new(move |router| {
            router.layer(middleware::from_fn_with_state(
                verifier.clone(),
                session_middleware,
            ))
        }))
    }
}
