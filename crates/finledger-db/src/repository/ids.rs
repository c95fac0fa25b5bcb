//! Integer id allocation backed by per-table `counter` records.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};

use crate::error::DbError;

#[derive(Debug, Deserialize)]
struct CounterRow {
    next: i64,
}

/// Reserve a contiguous range of `n` ids for `table` and return the
/// first id of the range. The counter bump is a single atomic UPSERT.
pub(crate) async fn next_ids<C: Connection>(
    db: &Surreal<C>,
    table: &str,
    n: i64,
) -> Result<i64, DbError> {
    let mut result = db
        .query("UPSERT type::thing('counter', $table) SET next = (next ?? 0) + $n RETURN AFTER")
        .bind(("table", table.to_string()))
        .bind(("n", n))
        .await?;

    let rows: Vec<CounterRow> = result.take(0)?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| DbError::Migration(format!("counter upsert for '{table}' returned no row")))?;

    Ok(row.next - n + 1)
}

/// Allocate a single id for `table`.
pub(crate) async fn next_id<C: Connection>(db: &Surreal<C>, table: &str) -> Result<i64, DbError> {
    next_ids(db, table, 1).await
}
