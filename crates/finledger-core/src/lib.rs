//! finledger core — domain models, error types, repository traits, and
//! the time source abstraction.
//!
//! This crate has no knowledge of the database or of any transport; the
//! service crates depend on the traits defined here and the `finledger-db`
//! crate implements them.

pub mod clock;
pub mod error;
pub mod models;
pub mod repository;
