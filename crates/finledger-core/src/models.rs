//! Domain models.

pub mod operation;
pub mod user;
