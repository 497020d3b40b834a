//! Integration ports.
//!
//! Every third-party concern the server is wired to sits behind one of these
//! traits. Startup only depends on the traits, so each integration can be
//! swapped or made to fail independently.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use super::jobs::{JobClient, JobFunction, JobsConfig};

/// A deferred router transformation, usually `router.layer(..)`.
///
/// Middleware is collected during startup and applied once, when the final
/// router is assembled, so it wraps every route regardless of registration
/// order.
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(Router) -> Router + Send + Sync>);

impl Middleware {
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(Router) -> Router + Send + Sync + 'static,
    {
        Self(Arc::new(apply))
    }

    /// Wrap `router` with this middleware.
    pub fn apply(&self, router: Router) -> Router {
        (self.0)(router)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Middleware(..)")
    }
}

/// Error telemetry hooks. Each factory is registered on its own, so one
/// failing does not take the others down.
pub trait ErrorTelemetry: Send + Sync {
    /// Per-request scope; registered before all other middleware.
    fn request_hook(&self) -> anyhow::Result<Middleware>;

    /// Performance tracing of each request.
    fn tracing_hook(&self) -> anyhow::Result<Middleware>;

    /// Error capture; registered last, assembled around every other
    /// middleware.
    fn error_handler(&self) -> anyhow::Result<Middleware>;
}

/// Session authentication provider.
pub trait AuthProvider: Send + Sync {
    /// Build the middleware that attaches the caller's identity to requests.
    /// May fail (or panic) during construction.
    fn middleware(&self) -> anyhow::Result<Middleware>;
}

/// A group of application routes mounted under a fixed prefix.
pub trait RouteModule: Send + Sync {
    fn routes(&self) -> anyhow::Result<Router>;
}

/// Primary data store. Failing to connect is fatal for startup.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn connect(&self) -> anyhow::Result<()>;
}

/// Background job integration whose configuration is resolved at runtime.
#[async_trait]
pub trait JobsModule: Send + Sync {
    /// Resolve the job client and the functions it serves.
    async fn resolve(&self) -> anyhow::Result<JobsConfig>;

    /// Obtain the HTTP serving adapter for the resolved configuration.
    fn serve_adapter(&self) -> anyhow::Result<Arc<dyn ServeAdapter>>;
}

/// Binds a job client and its functions to an HTTP router.
pub trait ServeAdapter: Send + Sync {
    fn serve(&self, client: JobClient, functions: Vec<JobFunction>) -> anyhow::Result<Router>;
}

/// The full set of integrations the bootstrap sequence wires together.
#[derive(Clone)]
pub struct Integrations {
    pub telemetry: Arc<dyn ErrorTelemetry>,
    pub auth: Arc<dyn AuthProvider>,
    pub chat: Arc<dyn RouteModule>,
    pub store: Arc<dyn DataStore>,
    pub jobs: Arc<dyn JobsModule>,
}

impl fmt::Debug for Integrations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integrations").finish_non_exhaustive()
    }
}
