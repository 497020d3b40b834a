//! Startup error types.

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("capability `{capability}` failed to register: {source}")]
    Registration {
        capability: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("data store connection failed: {0}")]
    DataStore(#[source] anyhow::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

impl BootstrapError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
