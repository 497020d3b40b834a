//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.

mod user_repository;

pub use user_repository::PgUserRepository;
