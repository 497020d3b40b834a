//! Startup Finalization Tests

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use chat_backend::bootstrap::BootstrapError;
use chat_backend::domain::jobs::JobsConfig;
use chat_backend::presentation::middleware::SessionAuth;
use chat_backend::startup::{Application, StartupPhase};

use crate::common::*;

fn auth() -> Arc<SessionAuth> {
    Arc::new(SessionAuth::new(
        chat_backend::config::Settings::local().auth.secret_key,
    ))
}

#[tokio::test]
async fn test_healthy_startup_walks_every_phase() {
    let app = TestApp::healthy().await;

    assert_eq!(
        app.app.phases(),
        &[
            StartupPhase::Init,
            StartupPhase::DbConnecting,
            StartupPhase::DbConnected,
            StartupPhase::JobsLoading,
            StartupPhase::JobsMounted,
            StartupPhase::RoutesSnapshot,
            StartupPhase::Listening,
        ]
    );
}

#[tokio::test]
async fn test_data_store_failure_aborts_with_exit_code_one() {
    let assets = static_dir();
    let settings = test_settings(&assets);
    let integrations = integrations(&settings, auth(), failing_store(), working_jobs());

    let err = Application::build(settings, integrations).await.unwrap_err();

    assert!(matches!(err, BootstrapError::DataStore(_)));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_data_store_failure_never_binds_the_port() {
    // Reserve a free port, release it, and point the server at it.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let assets = static_dir();
    let mut settings = test_settings(&assets);
    settings.server.port = port;
    let integrations = integrations(&settings, auth(), failing_store(), failing_jobs_unused());

    assert!(Application::build(settings, integrations).await.is_err());
    assert!(
        TcpStream::connect(("127.0.0.1", port)).await.is_err(),
        "nothing should be listening after a fatal startup failure"
    );
}

/// Jobs double that must not be touched.
fn failing_jobs_unused() -> MockJobs {
    let mut jobs = MockJobs::new();
    jobs.expect_resolve().never();
    jobs.expect_serve_adapter().never();
    jobs
}

#[tokio::test]
async fn test_job_resolution_failure_skips_mount_but_listens() {
    let assets = static_dir();
    let settings = test_settings(&assets);
    let integrations = integrations(&settings, auth(), connected_store(), failing_jobs());

    let app = TestApp::build(settings, integrations, assets).await.unwrap();

    assert!(app.app.phases().contains(&StartupPhase::JobsSkipped));
    assert_eq!(app.app.phases().last(), Some(&StartupPhase::Listening));
    let snapshot = app.app.snapshot().unwrap();
    assert!(!snapshot.paths().contains(&"/api/inngest"));
}

#[tokio::test]
async fn test_missing_client_skips_mount() {
    let assets = static_dir();
    let settings = test_settings(&assets);
    let mut jobs = MockJobs::new();
    jobs.expect_resolve().returning(|| {
        Ok(JobsConfig {
            client: None,
            functions: Some(vec![echo_function("echo")]),
        })
    });
    jobs.expect_serve_adapter().never();
    let integrations = integrations(&settings, auth(), connected_store(), jobs);

    let app = TestApp::build(settings, integrations, assets).await.unwrap();

    assert!(app.app.phases().contains(&StartupPhase::JobsSkipped));
    // The unmounted prefix falls through to the frontend
    let response = app.send("POST", "/api/inngest?fnId=echo").await;
    assert_eq!(body_string(response).await, INDEX_HTML);
}

#[tokio::test]
async fn test_missing_functions_skips_mount() {
    let config = JobsConfig {
        client: Some(job_client()),
        functions: None,
    };
    let assets = static_dir();
    let settings = test_settings(&assets);
    let jobs = jobs_resolving(config, "");
    let integrations = integrations(&settings, auth(), connected_store(), jobs);

    let app = TestApp::build(settings, integrations, assets).await.unwrap();

    assert!(app.app.phases().contains(&StartupPhase::JobsSkipped));
    assert_eq!(app.app.phases().last(), Some(&StartupPhase::Listening));
}

#[tokio::test]
async fn test_adapter_failure_skips_mount() {
    let assets = static_dir();
    let settings = test_settings(&assets);
    let mut jobs = MockJobs::new();
    jobs.expect_resolve().returning(|| {
        Ok(JobsConfig {
            client: Some(job_client()),
            functions: Some(vec![echo_function("echo")]),
        })
    });
    jobs.expect_serve_adapter()
        .returning(|| Err(anyhow::anyhow!("serve adapter missing")));
    let integrations = integrations(&settings, auth(), connected_store(), jobs);

    let app = TestApp::build(settings, integrations, assets).await.unwrap();

    assert!(app.app.phases().contains(&StartupPhase::JobsSkipped));
}

#[tokio::test]
async fn test_duplicate_job_functions_skip_mount() {
    let config = JobsConfig {
        client: Some(job_client()),
        functions: Some(vec![echo_function("same"), echo_function("same")]),
    };
    let assets = static_dir();
    let settings = test_settings(&assets);
    let jobs = jobs_resolving(config, "");
    let integrations = integrations(&settings, auth(), connected_store(), jobs);

    let app = TestApp::build(settings, integrations, assets).await.unwrap();

    assert!(app.app.phases().contains(&StartupPhase::JobsSkipped));
}

#[tokio::test]
async fn test_snapshot_lists_bound_routes_in_order() {
    let app = TestApp::healthy().await;

    let snapshot = app.app.snapshot().unwrap();

    assert_eq!(
        snapshot.paths(),
        vec!["/debug-sentry", "/api/chat", "/api/inngest"]
    );
    assert_eq!(
        snapshot.capabilities,
        vec![
            "sentry-request-hook",
            "sentry-tracing-hook",
            "json-body-parser",
            "cors",
            "auth-middleware",
            "debug-sentry-route",
            "chat-routes",
            "static-assets",
            "spa-fallback",
            "sentry-error-handler",
            "inngest-serve",
        ]
    );
}

#[tokio::test]
async fn test_listening_server_accepts_connections() {
    let assets = static_dir();
    let settings = test_settings(&assets);
    let integrations = integrations(&settings, auth(), connected_store(), working_jobs());
    let app = Application::build(settings, integrations).await.unwrap();
    let addr = app.local_addr().unwrap();
    let server = tokio::spawn(app.run_until_stopped());

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /assets/app.js HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.ends_with(APP_JS));

    server.abort();
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();

    let assets = static_dir();
    let mut settings = test_settings(&assets);
    settings.server.port = port;
    let integrations = integrations(&settings, auth(), connected_store(), working_jobs());

    let err = Application::build(settings, integrations).await.unwrap_err();

    assert!(matches!(err, BootstrapError::Bind { .. }));
    drop(occupied);
}
