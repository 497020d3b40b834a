//! Route Configuration
//!
//! Paths of the HTTP surface and the chat route group.

use axum::{routing::get, Router};

use super::handlers;
use crate::config::ChatSettings;
use crate::domain::ports::RouteModule;

/// Prefix of the chat route group.
pub const CHAT_PREFIX: &str = "/api/chat";

/// Prefix of the background job serve endpoint.
pub const JOBS_PREFIX: &str = "/api/inngest";

/// Route that always fails, for telemetry checks.
pub const DEBUG_SENTRY_PATH: &str = "/debug-sentry";

/// State shared by chat handlers
#[derive(Debug, Clone)]
pub struct ChatState {
    pub settings: ChatSettings,
}

/// Chat routes, relative to [`CHAT_PREFIX`]
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/token", get(handlers::chat::get_chat_token))
        .with_state(state)
}

/// Default chat [`RouteModule`].
#[derive(Debug, Clone)]
pub struct ChatRoutes {
    settings: ChatSettings,
}

impl ChatRoutes {
    pub fn new(settings: ChatSettings) -> Self {
        Self { settings }
    }
}

impl RouteModule for ChatRoutes {
    fn routes(&self) -> anyhow::Result<Router> {
        if self.settings.api_key.is_empty() || self.settings.api_secret.is_empty() {
            anyhow::bail!("chat API key and secret must both be configured");
        }
        Ok(chat_router(ChatState {
            settings: self.settings.clone(),
        }))
    }
}
