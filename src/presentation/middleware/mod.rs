//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod body;
pub mod cors;
pub mod error_report;

pub use auth::{session_middleware, AuthUser, SessionAuth, SessionVerifier};
pub use error_report::{handle_panic, report_server_errors};
