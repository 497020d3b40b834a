//! Application Startup
//!
//! Runs the capability sequence, then finalizes startup:
//!
//! ```text
//! Init ─▶ DbConnecting ─▶ DbConnected ─▶ JobsLoading ─┬▶ JobsMounted ─┬▶ RoutesSnapshot
//!              │                                      └▶ JobsSkipped ─┘        │
//!              └──────▶ Aborted (exit 1)                              Listening ◀┘
//! ```
//!
//! Every step runs to completion before the next one starts.

use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};

use axum::Router;
use tokio::net::TcpListener;

use crate::bootstrap::{
    self, guard, BootstrapError, Capability, Outcome, RouteSnapshot, ServerBuilder,
};
use crate::config::Settings;
use crate::domain::ports::{Integrations, JobsModule};
use crate::presentation::http::routes::JOBS_PREFIX;

/// Startup states, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPhase {
    Init,
    DbConnecting,
    DbConnected,
    JobsLoading,
    JobsMounted,
    JobsSkipped,
    RoutesSnapshot,
    Listening,
    Aborted,
}

/// Records phase transitions.
#[derive(Debug)]
struct PhaseTracker {
    history: Vec<StartupPhase>,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            history: vec![StartupPhase::Init],
        }
    }

    fn enter(&mut self, phase: StartupPhase) {
        tracing::debug!(?phase, "Startup phase");
        self.history.push(phase);
    }
}

/// Application instance
#[derive(Debug)]
pub struct Application {
    listener: TcpListener,
    router: Router,
    phases: Vec<StartupPhase>,
    snapshot: Option<RouteSnapshot>,
}

impl Application {
    /// Build the application: register capabilities, connect the data store,
    /// mount background jobs if available, and bind the listener.
    ///
    /// # Errors
    ///
    /// Fails when the data store cannot be reached, a fatal capability fails,
    /// or the listener cannot be bound. Recoverable failures are only logged.
    pub async fn build(
        settings: Settings,
        integrations: Integrations,
    ) -> Result<Self, BootstrapError> {
        let mut phases = PhaseTracker::new();
        let mut builder = ServerBuilder::new();

        let capabilities = bootstrap::capabilities(&settings, &integrations);
        if let Err(error) = bootstrap::register_all(&mut builder, capabilities) {
            phases.enter(StartupPhase::Aborted);
            return Err(error);
        }

        phases.enter(StartupPhase::DbConnecting);
        if let Err(error) = integrations.store.connect().await {
            phases.enter(StartupPhase::Aborted);
            tracing::error!(
                error = %error,
                details = ?error,
                "Error starting server: data store unavailable"
            );
            return Err(BootstrapError::DataStore(error));
        }
        phases.enter(StartupPhase::DbConnected);

        phases.enter(StartupPhase::JobsLoading);
        if mount_jobs(&mut builder, integrations.jobs.as_ref()).await {
            phases.enter(StartupPhase::JobsMounted);
        } else {
            phases.enter(StartupPhase::JobsSkipped);
        }

        phases.enter(StartupPhase::RoutesSnapshot);
        let snapshot = take_snapshot(&builder);

        let addr = settings.server_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(source) => {
                phases.enter(StartupPhase::Aborted);
                tracing::error!(%addr, error = %source, "Error starting server: bind failed");
                return Err(BootstrapError::Bind { addr, source });
            }
        };
        let local_addr = listener.local_addr()?;

        phases.enter(StartupPhase::Listening);
        tracing::info!(port = local_addr.port(), address = %local_addr, "Server started");

        Ok(Self {
            listener,
            router: builder.into_router(),
            phases: phases.history,
            snapshot,
        })
    }

    /// Run the server until Ctrl-C or SIGTERM
    pub async fn run_until_stopped(self) -> Result<(), BootstrapError> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Phases entered during startup, starting with `Init`.
    pub fn phases(&self) -> &[StartupPhase] {
        &self.phases
    }

    /// Route snapshot taken before binding, if enumeration succeeded.
    pub fn snapshot(&self) -> Option<&RouteSnapshot> {
        self.snapshot.as_ref()
    }

    /// The assembled router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Resolve and mount the job integration. Returns whether it was mounted;
/// every failure degrades to skipping it.
async fn mount_jobs(builder: &mut ServerBuilder, jobs: &dyn JobsModule) -> bool {
    let config = match jobs.resolve().await {
        Ok(config) => config,
        Err(error) => {
            tracing::warn!(
                error = %error,
                details = ?error,
                "Background jobs unavailable, continuing without them"
            );
            return false;
        }
    };

    let Some((client, functions)) = config.into_parts() else {
        tracing::warn!("Background job client or functions missing, {} not mounted", JOBS_PREFIX);
        return false;
    };

    let adapter = match jobs.serve_adapter() {
        Ok(adapter) => adapter,
        Err(error) => {
            tracing::warn!(
                error = %error,
                details = ?error,
                "Background job serve adapter unavailable"
            );
            return false;
        }
    };

    // The guard emits the only warning when the mount fails.
    let capability = Capability::optional("inngest-serve", move |builder| {
        let router = adapter.serve(client, functions)?;
        builder.nest(JOBS_PREFIX, router)
    });

    matches!(guard::register(builder, capability), Ok(Outcome::Registered))
}

/// Best-effort enumeration of everything bound so far.
fn take_snapshot(builder: &ServerBuilder) -> Option<RouteSnapshot> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let snapshot = builder.snapshot();
        snapshot.log();
        snapshot
    }));

    match result {
        Ok(snapshot) => Some(snapshot),
        Err(_) => {
            tracing::warn!("Could not enumerate routes");
            None
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %error, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
