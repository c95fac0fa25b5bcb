//! SurrealDB implementation of [`OperationRepository`].
//!
//! Every query is keyed by `(id, user_id)` — the ownership policy for
//! transaction records lives here. A row that exists but belongs to
//! another user produces the same `NotFound` as a missing row, on every
//! code path, so existence never leaks across users.

use std::str::FromStr;

use chrono::NaiveDate;
use finledger_core::error::LedgerResult;
use finledger_core::models::operation::{
    CreateOperation, Operation, OperationKind, UpdateOperation,
};
use finledger_core::repository::OperationRepository;
use rust_decimal::Decimal;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};

use crate::error::DbError;
use crate::repository::ids::{next_id, next_ids};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, Deserialize)]
struct OperationRow {
    user_id: i64,
    date: String,
    kind: String,
    amount: String,
    description: Option<String>,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct OperationRowWithId {
    record_id: i64,
    user_id: i64,
    date: String,
    kind: String,
    amount: String,
    description: Option<String>,
}

fn parse_kind(s: &str) -> Result<OperationKind, DbError> {
    match s {
        "income" => Ok(OperationKind::Income),
        "outcome" => Ok(OperationKind::Outcome),
        other => Err(DbError::Corrupt(format!("unknown operation kind: {other}"))),
    }
}

fn kind_to_str(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Income => "income",
        OperationKind::Outcome => "outcome",
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DbError::Corrupt(format!("invalid operation date '{s}': {e}")))
}

fn parse_amount(s: &str) -> Result<Decimal, DbError> {
    Decimal::from_str(s).map_err(|e| DbError::Corrupt(format!("invalid amount '{s}': {e}")))
}

/// Rescale to exactly two fractional digits before storage, so stored
/// and returned amounts behave like a NUMERIC(10,2) column.
fn normalize_amount(mut amount: Decimal) -> Decimal {
    amount.rescale(2);
    amount
}

impl OperationRow {
    fn into_operation(self, id: i64) -> Result<Operation, DbError> {
        Ok(Operation {
            id,
            user_id: self.user_id,
            date: parse_date(&self.date)?,
            kind: parse_kind(&self.kind)?,
            amount: parse_amount(&self.amount)?,
            description: self.description,
        })
    }
}

impl OperationRowWithId {
    fn into_operation(self) -> Result<Operation, DbError> {
        Ok(Operation {
            id: self.record_id,
            user_id: self.user_id,
            date: parse_date(&self.date)?,
            kind: parse_kind(&self.kind)?,
            amount: parse_amount(&self.amount)?,
            description: self.description,
        })
    }
}

/// SurrealDB implementation of the Operation repository.
#[derive(Clone)]
pub struct SurrealOperationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOperationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OperationRepository for SurrealOperationRepository<C> {
    async fn create(&self, user_id: i64, input: CreateOperation) -> LedgerResult<Operation> {
        let id = next_id(&self.db, "operation").await?;
        let amount = normalize_amount(input.amount);

        let result = self
            .db
            .query(
                "CREATE type::thing('operation', $id) SET \
                 user_id = $user_id, \
                 date = $date, \
                 kind = $kind, \
                 amount = $amount, \
                 description = $description",
            )
            .bind(("id", id))
            .bind(("user_id", user_id))
            .bind(("date", input.date.format(DATE_FORMAT).to_string()))
            .bind(("kind", kind_to_str(input.kind).to_string()))
            .bind(("amount", amount.to_string()))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OperationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "operation".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_operation(id)?)
    }

    async fn create_many(
        &self,
        user_id: i64,
        inputs: Vec<CreateOperation>,
    ) -> LedgerResult<Vec<Operation>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let count = inputs.len();
        let first_id = next_ids(&self.db, "operation", count as i64).await?;
        let ids: Vec<i64> = (0..count as i64).map(|i| first_id + i).collect();

        // One statement per row inside a single transaction: either the
        // whole batch commits or none of it is visible.
        let mut sql = String::from("BEGIN TRANSACTION;");
        for i in 0..count {
            sql.push_str(&format!(
                " CREATE type::thing('operation', $id{i}) SET \
                 user_id = $user_id, \
                 date = $date{i}, \
                 kind = $kind{i}, \
                 amount = $amount{i}, \
                 description = $description{i};"
            ));
        }
        sql.push_str(" COMMIT TRANSACTION;");

        let mut builder = self.db.query(sql).bind(("user_id", user_id));
        for (i, input) in inputs.into_iter().enumerate() {
            builder = builder
                .bind((format!("id{i}"), ids[i]))
                .bind((format!("date{i}"), input.date.format(DATE_FORMAT).to_string()))
                .bind((format!("kind{i}"), kind_to_str(input.kind).to_string()))
                .bind((
                    format!("amount{i}"),
                    normalize_amount(input.amount).to_string(),
                ))
                .bind((format!("description{i}"), input.description));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let mut operations = Vec::with_capacity(count);
        for (i, id) in ids.iter().enumerate() {
            let rows: Vec<OperationRow> = result.take(i).map_err(DbError::from)?;
            let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
                entity: "operation".into(),
                id: id.to_string(),
            })?;
            operations.push(row.into_operation(*id)?);
        }

        Ok(operations)
    }

    async fn get(&self, user_id: i64, id: i64) -> LedgerResult<Operation> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::thing('operation', $id) \
                 WHERE user_id = $user_id",
            )
            .bind(("id", id))
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OperationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "operation".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_operation(id)?)
    }

    async fn list(
        &self,
        user_id: i64,
        kind: Option<OperationKind>,
    ) -> LedgerResult<Vec<Operation>> {
        let mut result = match kind {
            Some(kind) => {
                self.db
                    .query(
                        "SELECT meta::id(id) AS record_id, * FROM operation \
                         WHERE user_id = $user_id AND kind = $kind",
                    )
                    .bind(("user_id", user_id))
                    .bind(("kind", kind_to_str(kind).to_string()))
                    .await
            }
            None => {
                self.db
                    .query(
                        "SELECT meta::id(id) AS record_id, * FROM operation \
                         WHERE user_id = $user_id",
                    )
                    .bind(("user_id", user_id))
                    .await
            }
        }
        .map_err(DbError::from)?;

        let rows: Vec<OperationRowWithId> = result.take(0).map_err(DbError::from)?;
        let operations = rows
            .into_iter()
            .map(OperationRowWithId::into_operation)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(operations)
    }

    async fn list_recent(&self, user_id: i64) -> LedgerResult<Vec<Operation>> {
        // ISO dates sort correctly as strings, so ORDER BY works on the
        // stored representation.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM operation \
                 WHERE user_id = $user_id \
                 ORDER BY date DESC, id DESC",
            )
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OperationRowWithId> = result.take(0).map_err(DbError::from)?;
        let operations = rows
            .into_iter()
            .map(OperationRowWithId::into_operation)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(operations)
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: UpdateOperation,
    ) -> LedgerResult<Operation> {
        let amount = normalize_amount(input.amount);

        let result = self
            .db
            .query(
                "UPDATE type::thing('operation', $id) SET \
                 date = $date, \
                 kind = $kind, \
                 amount = $amount, \
                 description = $description \
                 WHERE user_id = $user_id",
            )
            .bind(("id", id))
            .bind(("user_id", user_id))
            .bind(("date", input.date.format(DATE_FORMAT).to_string()))
            .bind(("kind", kind_to_str(input.kind).to_string()))
            .bind(("amount", amount.to_string()))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<OperationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "operation".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_operation(id)?)
    }

    async fn delete(&self, user_id: i64, id: i64) -> LedgerResult<()> {
        let mut result = self
            .db
            .query(
                "DELETE type::thing('operation', $id) \
                 WHERE user_id = $user_id \
                 RETURN BEFORE",
            )
            .bind(("id", id))
            .bind(("user_id", user_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OperationRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "operation".into(),
                id: id.to_string(),
            }
            .into());
        }

        Ok(())
    }
}
