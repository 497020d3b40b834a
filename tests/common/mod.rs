//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test doubles for the integration ports.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mockall::mock;
use tempfile::TempDir;
use tower::ServiceExt;

use chat_backend::bootstrap::BootstrapError;
use chat_backend::config::Settings;
use chat_backend::domain::jobs::{JobClient, JobFunction, JobsConfig};
use chat_backend::domain::{
    AuthProvider, DataStore, Integrations, JobsModule, Middleware, ServeAdapter,
};
use chat_backend::infrastructure::jobs::InngestServe;
use chat_backend::infrastructure::sentry_hooks::SentryTelemetry;
use chat_backend::presentation::http::routes::ChatRoutes;
use chat_backend::presentation::middleware::auth::Claims;
use chat_backend::presentation::middleware::SessionAuth;
use chat_backend::startup::Application;

pub const INDEX_HTML: &str = "<!doctype html><title>chat</title>";
pub const APP_JS: &str = "console.log('chat');";

mock! {
    pub Store {}

    #[async_trait]
    impl DataStore for Store {
        async fn connect(&self) -> anyhow::Result<()>;
    }
}

mock! {
    pub Jobs {}

    #[async_trait]
    impl JobsModule for Jobs {
        async fn resolve(&self) -> anyhow::Result<JobsConfig>;
        fn serve_adapter(&self) -> anyhow::Result<Arc<dyn ServeAdapter>>;
    }
}

/// Auth provider whose factory returns an error.
pub struct FailingAuth;

impl AuthProvider for FailingAuth {
    fn middleware(&self) -> anyhow::Result<Middleware> {
        Err(anyhow!("auth provider misconfigured"))
    }
}

/// Auth provider whose factory panics, like a library throwing on import.
pub struct PanickingAuth;

impl AuthProvider for PanickingAuth {
    fn middleware(&self) -> anyhow::Result<Middleware> {
        panic!("auth provider exploded during construction")
    }
}

/// Auth provider that builds fine but panics on every request.
pub struct PanickingRequestAuth;

impl AuthProvider for PanickingRequestAuth {
    fn middleware(&self) -> anyhow::Result<Middleware> {
        Ok(Middleware::new(|router| {
            router.layer(axum::middleware::from_fn(explode_on_request))
        }))
    }
}

async fn explode_on_request(_request: Request<Body>, _next: Next) -> Response {
    panic!("session store unreachable")
}

pub fn connected_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_connect().times(1).returning(|| Ok(()));
    store
}

pub fn failing_store() -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_connect()
        .times(1)
        .returning(|| Err(anyhow!("connection refused")));
    store
}

pub fn job_client() -> JobClient {
    JobClient {
        app_id: "chat-backend".into(),
        event_key: "test-event-key".into(),
    }
}

pub fn echo_function(id: &str) -> JobFunction {
    JobFunction::new(id, id, "test/event", |event| async move {
        Ok::<_, anyhow::Error>(event)
    })
}

/// Job module resolving to `config`, served by the default adapter.
pub fn jobs_resolving(config: JobsConfig, signing_key: &str) -> MockJobs {
    let signing_key = signing_key.to_string();
    let mut jobs = MockJobs::new();
    jobs.expect_resolve().returning(move || Ok(config.clone()));
    jobs.expect_serve_adapter().returning(move || {
        Ok(Arc::new(InngestServe::new(signing_key.clone())) as Arc<dyn ServeAdapter>)
    });
    jobs
}

pub fn working_jobs() -> MockJobs {
    jobs_resolving(
        JobsConfig {
            client: Some(job_client()),
            functions: Some(vec![echo_function("echo")]),
        },
        "",
    )
}

pub fn failing_jobs() -> MockJobs {
    let mut jobs = MockJobs::new();
    jobs.expect_resolve()
        .returning(|| Err(anyhow!("cannot load job configuration")));
    jobs.expect_serve_adapter().never();
    jobs
}

/// A static asset directory with `index.html` and `assets/app.js`.
pub fn static_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "index.html", INDEX_HTML);
    std::fs::create_dir_all(dir.path().join("assets")).unwrap();
    write_file(dir.path(), "assets/app.js", APP_JS);
    dir
}

fn write_file(root: &Path, name: &str, contents: &str) {
    std::fs::write(root.join(name), contents).unwrap();
}

/// Settings pointing at `assets`, listening on an ephemeral port.
pub fn test_settings(assets: &TempDir) -> Settings {
    let mut settings = Settings::local();
    settings.assets.dir = Some(assets.path().to_path_buf());
    settings
}

/// Integrations with working defaults and the given doubles.
pub fn integrations(
    settings: &Settings,
    auth: Arc<dyn AuthProvider>,
    store: MockStore,
    jobs: MockJobs,
) -> Integrations {
    Integrations {
        telemetry: Arc::new(SentryTelemetry),
        auth,
        chat: Arc::new(ChatRoutes::new(settings.chat.clone())),
        store: Arc::new(store),
        jobs: Arc::new(jobs),
    }
}

/// Test application builder
pub struct TestApp {
    pub app: Application,
    pub settings: Settings,
    // Keeps the asset directory alive for the duration of the test.
    _assets: TempDir,
}

impl TestApp {
    /// Start with every integration healthy.
    pub async fn healthy() -> Self {
        Self::with_auth(Arc::new(SessionAuth::new(
            Settings::local().auth.secret_key,
        )))
        .await
    }

    /// Start with the given auth provider, everything else healthy.
    pub async fn with_auth(auth: Arc<dyn AuthProvider>) -> Self {
        let assets = static_dir();
        let settings = test_settings(&assets);
        let integrations = integrations(&settings, auth, connected_store(), working_jobs());
        Self::build(settings, integrations, assets).await.unwrap()
    }

    pub async fn build(
        settings: Settings,
        integrations: Integrations,
        assets: TempDir,
    ) -> Result<Self, BootstrapError> {
        let app = Application::build(settings.clone(), integrations).await?;
        Ok(Self {
            app,
            settings,
            _assets: assets,
        })
    }

    pub fn router(&self) -> Router {
        self.app.router()
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.unwrap()
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, uri: &str, token: &str) -> Response {
        self.request(
            Request::builder()
                .uri(uri)
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a request with an arbitrary method and no body
    pub async fn send(&self, method: &str, uri: &str) -> Response {
        self.request(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Session token for `user_id`, signed with the configured secret.
    pub fn session_token(&self, user_id: &str) -> String {
        session_token(&self.settings.auth.secret_key, user_id)
    }
}

pub fn session_token(secret: &str, user_id: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.into(),
        iat: now,
        exp: now + 600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status for response");
}
