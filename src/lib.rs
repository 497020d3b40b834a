//! # Chat Backend Library
//!
//! Backend for a chat application: session authentication, chat token
//! issuance, background user sync jobs, Sentry error telemetry and the
//! bundled frontend, brought up by a fault-tolerant startup sequence.
//!
//! ## Architecture
//!
//! - **Domain Layer**: integration ports, job and user models
//! - **Bootstrap**: guarded, ordered registration of middleware and routes
//! - **Infrastructure Layer**: PostgreSQL, Sentry hooks, job platform adapter
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! chat_backend/
//! +-- config/         Configuration management
//! +-- domain/         Ports, job and user models
//! +-- bootstrap/      Capabilities, registration guard, server builder
//! +-- infrastructure/ Database, Sentry and job implementations
//! +-- presentation/   HTTP routes, handlers and middleware
//! +-- shared/         Common utilities (errors)
//! +-- startup.rs      Startup finalization and serving
//! ```

// Configuration module
pub mod config;

// Domain layer - ports and models
pub mod domain;

// Startup registration
pub mod bootstrap;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers and middleware
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
