//! Error types for the finledger system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} already exists")]
    Conflict { entity: String },

    /// All credential and token failures surface as this one variant.
    /// It deliberately carries no reason so callers cannot tell an
    /// unknown username from a wrong password, or a bad signature from
    /// an expired token.
    #[error("could not validate credentials")]
    Unauthorized,

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
