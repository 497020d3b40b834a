//! Static frontend assets and the single-page-app fallback.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;
use axum::{
    response::Html,
    routing::{any, MethodRouter},
};

use crate::config::AssetSettings;
use crate::shared::error::AppError;

/// Directory name of the bundled frontend, next to the executable.
pub const PUBLIC_DIR: &str = "public";

/// Document served for client-side routes.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Resolve the asset root: the configured directory, or `public/` beside
/// the running executable.
pub fn resolve_static_dir(settings: &AssetSettings) -> anyhow::Result<PathBuf> {
    if let Some(dir) = &settings.dir {
        return Ok(dir.clone());
    }

    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?
        .join(PUBLIC_DIR);
    Ok(dir)
}

/// Catch-all handler answering any method with the index document.
pub fn spa_fallback(index: PathBuf) -> MethodRouter {
    any(move || serve_index(index.clone()))
}

async fn serve_index(index: PathBuf) -> Result<Html<Vec<u8>>, AppError> {
    match tokio::fs::read(&index).await {
        Ok(contents) => Ok(Html(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::NotFound(format!("{INDEX_DOCUMENT} not found")))
        }
        Err(e) => Err(AppError::Internal(format!(
            "failed to read {}: {}",
            index.display(),
            e
        ))),
    }
}
