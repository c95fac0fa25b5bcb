//! finledger database — SurrealDB connection management, schema
//! migrations, and repository implementations.
//!
//! The per-user data-isolation policy is enforced here: every operation
//! query is keyed by `(id, user_id)`, so records owned by another user
//! are indistinguishable from records that do not exist.

mod connection;
mod error;
mod schema;

pub mod repository;

pub use connection::{DbConfig, connect};
pub use error::DbError;
pub use schema::run_migrations;
