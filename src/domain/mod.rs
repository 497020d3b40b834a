//! # Domain Layer
//!
//! Contracts the rest of the server is written against.
//!
//! ## Structure
//!
//! - **ports**: traits for every external integration
//! - **jobs**: background job client and function model
//! - **user**: users mirrored from the identity provider
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository and integration traits define the contracts

pub mod jobs;
pub mod ports;
pub mod user;

pub use ports::{
    AuthProvider, DataStore, ErrorTelemetry, Integrations, JobsModule, Middleware, RouteModule,
    ServeAdapter,
};
