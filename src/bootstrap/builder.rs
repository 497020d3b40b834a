//! The mutable server registry built up during startup.

use std::fmt;
use std::path::PathBuf;

use axum::{routing::MethodRouter, Router};
use tower_http::services::ServeDir;

use crate::domain::ports::Middleware;

/// Kind of entry recorded in the builder's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Telemetry,
    ErrorHandler,
    Middleware,
    Route,
    Mount,
    Static,
    Fallback,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            BindingKind::Telemetry => "telemetry",
            BindingKind::ErrorHandler => "error handler",
            BindingKind::Middleware => "middleware",
            BindingKind::Route => "route",
            BindingKind::Mount => "mount",
            BindingKind::Static => "static",
            BindingKind::Fallback => "fallback",
        };
        f.write_str(kind)
    }
}

/// One successful mutation of the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub kind: BindingKind,
    /// Route path, mount prefix, asset root or middleware label.
    pub target: String,
}

/// Accumulates middleware and routes, then assembles the final router.
///
/// Layers are applied when the router is assembled, from the outside in:
///
/// ```text
/// telemetry hooks ─▶ error handler ─▶ middleware ─▶ routes / static / fallback
/// ```
///
/// Within the telemetry and middleware groups the first registered layer is
/// outermost. The error handler therefore sees failures raised by every
/// ordinary middleware as well as the handlers, whenever it is registered.
/// Static assets take precedence over the fallback whatever their order.
#[derive(Debug, Clone, Default)]
pub struct ServerBuilder {
    router: Router,
    telemetry: Vec<Middleware>,
    error_handler: Option<Middleware>,
    middleware: Vec<Middleware>,
    static_root: Option<PathBuf>,
    fallback: Option<MethodRouter>,
    bindings: Vec<Binding>,
    applied: Vec<&'static str>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a middleware layer.
    ///
    /// The layer is applied once to an empty router immediately, so that
    /// construction panics (invalid CORS combinations and the like) surface
    /// during registration instead of at assembly time.
    pub fn use_middleware(&mut self, label: &str, middleware: Middleware) -> anyhow::Result<()> {
        let _ = middleware.apply(Router::new());
        self.middleware.push(middleware);
        self.record(BindingKind::Middleware, label);
        Ok(())
    }

    /// Queue a request telemetry layer, outside the error handler.
    pub fn use_telemetry(&mut self, label: &str, layer: Middleware) -> anyhow::Result<()> {
        let _ = layer.apply(Router::new());
        self.telemetry.push(layer);
        self.record(BindingKind::Telemetry, label);
        Ok(())
    }

    /// Install the error handler, wrapping every ordinary middleware.
    pub fn use_error_handler(&mut self, label: &str, handler: Middleware) -> anyhow::Result<()> {
        if self.error_handler.is_some() {
            anyhow::bail!("an error handler is already registered");
        }
        let _ = handler.apply(Router::new());
        self.error_handler = Some(handler);
        self.record(BindingKind::ErrorHandler, label);
        Ok(())
    }

    /// Bind a route. Panics from axum on invalid or overlapping paths are
    /// caught by the registration guard.
    pub fn route(&mut self, path: &str, method_router: MethodRouter) -> anyhow::Result<()> {
        self.router = std::mem::take(&mut self.router).route(path, method_router);
        self.record(BindingKind::Route, path);
        Ok(())
    }

    /// Mount a route group under `prefix`.
    pub fn nest(&mut self, prefix: &str, group: Router) -> anyhow::Result<()> {
        self.router = std::mem::take(&mut self.router).nest(prefix, group);
        self.record(BindingKind::Mount, prefix);
        Ok(())
    }

    /// Serve files from `root` for any path no route matched.
    pub fn serve_static(&mut self, root: PathBuf) -> anyhow::Result<()> {
        if let Some(existing) = &self.static_root {
            anyhow::bail!("static assets already served from {}", existing.display());
        }
        self.record(BindingKind::Static, &root.display().to_string());
        self.static_root = Some(root);
        Ok(())
    }

    /// Handle every request that neither a route nor a static file matched.
    pub fn fallback(&mut self, label: &str, handler: MethodRouter) -> anyhow::Result<()> {
        if self.fallback.is_some() {
            anyhow::bail!("a fallback handler is already registered");
        }
        self.fallback = Some(handler);
        self.record(BindingKind::Fallback, label);
        Ok(())
    }

    pub fn is_applied(&self, capability: &str) -> bool {
        self.applied.iter().any(|applied| *applied == capability)
    }

    pub(crate) fn mark_applied(&mut self, capability: &'static str) {
        self.applied.push(capability);
    }

    /// Capabilities registered so far, in order.
    pub fn applied(&self) -> &[&'static str] {
        &self.applied
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Point-in-time copy of everything bound so far.
    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            capabilities: self.applied.clone(),
            bindings: self.bindings.clone(),
        }
    }

    /// Assemble the final router.
    pub fn into_router(self) -> Router {
        let router = match (self.static_root, self.fallback) {
            (Some(root), Some(fallback)) => self.router.fallback_service(
                ServeDir::new(root)
                    .call_fallback_on_method_not_allowed(true)
                    .fallback(fallback),
            ),
            (Some(root), None) => self.router.fallback_service(ServeDir::new(root)),
            (None, Some(fallback)) => self.router.fallback_service(fallback),
            (None, None) => self.router,
        };

        let router = self
            .middleware
            .iter()
            .rev()
            .fold(router, |router, middleware| middleware.apply(router));
        let router = match &self.error_handler {
            Some(handler) => handler.apply(router),
            None => router,
        };
        self.telemetry
            .iter()
            .rev()
            .fold(router, |router, layer| layer.apply(router))
    }

    fn record(&mut self, kind: BindingKind, target: &str) {
        self.bindings.push(Binding {
            kind,
            target: target.to_string(),
        });
    }
}

/// Read-only listing of the builder's bindings, used for startup logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSnapshot {
    pub capabilities: Vec<&'static str>,
    pub bindings: Vec<Binding>,
}

impl RouteSnapshot {
    pub fn log(&self) {
        for binding in &self.bindings {
            tracing::info!(kind = %binding.kind, target = %binding.target, "Bound");
        }
        tracing::info!(
            capabilities = self.capabilities.len(),
            bindings = self.bindings.len(),
            "Route snapshot"
        );
    }

    /// Paths of routes and mounts, in registration order.
    pub fn paths(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|b| matches!(b.kind, BindingKind::Route | BindingKind::Mount))
            .map(|b| b.target.as_str())
            .collect()
    }
}
