//! CORS Middleware Configuration

use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

/// Create a CORS layer admitting exactly one origin, with credentials.
///
/// Methods and headers mirror the preflight request, since wildcards are not
/// allowed together with credentials.
pub fn create_cors_layer(client_url: &str) -> anyhow::Result<CorsLayer> {
    let origin = client_url.trim().trim_end_matches('/');
    if origin.is_empty() || origin == "*" {
        anyhow::bail!("CLIENT_URL must name a single origin, got `{client_url}`");
    }

    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("invalid CLIENT_URL `{client_url}`"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(3600)))
}
