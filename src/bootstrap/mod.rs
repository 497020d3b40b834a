//! # Bootstrap
//!
//! Fault-tolerant registration of middleware and routes.
//!
//! ```text
//! Capability ──▶ guard::register ──▶ ServerBuilder ──▶ into_router()
//!   (name,          (one log record,      (middleware,
//!    fatality,       rollback on           routes, static,
//!    action)         failure)              fallback, ledger)
//! ```
//!
//! A failing capability is logged and skipped; the rest of the sequence
//! still runs. Only capabilities tagged [`Fatality::Fatal`] stop startup.

mod builder;
mod capability;
mod error;
pub mod guard;
pub mod sequence;

pub use builder::{Binding, BindingKind, RouteSnapshot, ServerBuilder};
pub use capability::{Capability, Fatality};
pub use error::BootstrapError;
pub use guard::{register, Outcome};
pub use sequence::{capabilities, register_all, RegistrationReport};
