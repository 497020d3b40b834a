//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod assets;
pub mod chat;
pub mod debug;
