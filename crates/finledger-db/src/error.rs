//! Database-specific error types and conversions.

use finledger_core::error::LedgerError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} already exists")]
    Conflict { entity: String },

    /// A stored row that cannot be mapped back into the domain model
    /// (bad kind string, unparseable date or amount).
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<DbError> for LedgerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => LedgerError::NotFound { entity, id },
            DbError::Conflict { entity } => LedgerError::Conflict { entity },
            other => LedgerError::Database(other.to_string()),
        }
    }
}

/// Classify a store error from an insert: a unique-index violation
/// becomes `Conflict`, everything else passes through.
pub(crate) fn classify_insert_error(err: surrealdb::Error, entity: &str) -> DbError {
    if err.to_string().contains("already contains") {
        DbError::Conflict {
            entity: entity.into(),
        }
    } else {
        DbError::Surreal(err)
    }
}
