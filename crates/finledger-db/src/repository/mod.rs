//! SurrealDB repository implementations.

mod ids;
mod operation;
mod user;

pub use operation::SurrealOperationRepository;
pub use user::SurrealUserRepository;
