//! Schema definitions and the migration runner.
//!
//! All tables are SCHEMAFULL. Record ids are integers allocated from
//! `counter` records; enums and dates are stored as strings (ISO dates
//! sort correctly as text) and amounts as exact decimal strings.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

/// Tracking table; one record per applied migration. IF NOT EXISTS
/// throughout so this can run on every startup.
const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration COLUMNS version UNIQUE;
";

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;

-- =======================================================================
-- Operations (income/outcome transaction records, user scope)
-- =======================================================================
DEFINE TABLE operation SCHEMAFULL;
DEFINE FIELD user_id ON TABLE operation TYPE int;
DEFINE FIELD date ON TABLE operation TYPE string;
DEFINE FIELD kind ON TABLE operation TYPE string \
    ASSERT $value IN ['income', 'outcome'];
DEFINE FIELD amount ON TABLE operation TYPE string;
DEFINE FIELD description ON TABLE operation TYPE option<string>;
DEFINE INDEX idx_operation_user ON TABLE operation COLUMNS user_id;

-- =======================================================================
-- Integer id allocation (one counter record per table)
-- =======================================================================
DEFINE TABLE counter SCHEMAFULL;
DEFINE FIELD next ON TABLE counter TYPE int DEFAULT 0;
";

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

#[derive(Debug, Deserialize)]
struct MigrationRecord {
    version: u32,
}

/// Apply every migration newer than the highest recorded version.
///
/// Safe to call on every startup: already-applied versions are skipped
/// and the tracking DDL is idempotent.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("tracking table: {e}")))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let applied: Vec<MigrationRecord> = result.take(0)?;
    let current = applied.first().map_or(0, |record| record.version);

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(
            version = migration.version,
            name = migration.name,
            "applying schema migration"
        );

        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!("v{} ({}): {e}", migration.version, migration.name))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("recording v{}: {e}", migration.version)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_versions_start_at_one_and_ascend() {
        assert_eq!(MIGRATIONS[0].version, 1);
        assert!(MIGRATIONS.windows(2).all(|w| w[0].version < w[1].version));
    }

    #[test]
    fn initial_schema_defines_every_table() {
        for table in ["user", "operation", "counter"] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
                "missing table definition: {table}"
            );
        }
    }
}
