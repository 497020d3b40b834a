//! Request body limits.

use axum::extract::DefaultBodyLimit;

use crate::domain::ports::Middleware;

/// Cap the size of bodies read by the `Json` and other body extractors.
pub fn json_body_limit(limit: usize) -> Middleware {
    Middleware::new(move |router| router.layer(DefaultBodyLimit::max(limit)))
}
