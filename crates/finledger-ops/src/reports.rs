//! CSV import and export of operations.
//!
//! Wire format: a header row followed by `date,kind,amount,description`
//! records. Import parses the whole file before anything is written, so
//! a malformed row rejects the entire batch and persists nothing.

use std::io::Read;

use chrono::NaiveDate;
use finledger_core::error::{LedgerError, LedgerResult};
use finledger_core::models::operation::{CreateOperation, Operation, OperationKind};
use finledger_core::repository::OperationRepository;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::service::OperationService;

const REPORT_FIELDS: [&str; 4] = ["date", "kind", "amount", "description"];

/// One CSV record; field order matches [`REPORT_FIELDS`].
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    date: NaiveDate,
    kind: OperationKind,
    amount: Decimal,
    description: Option<String>,
}

/// Report service.
#[derive(Clone)]
pub struct ReportService<R: OperationRepository> {
    operations: OperationService<R>,
}

impl<R: OperationRepository> ReportService<R> {
    pub fn new(operations: OperationService<R>) -> Self {
        Self { operations }
    }

    /// Parse a CSV of operations and persist them for `user_id`.
    ///
    /// A row that fails to parse rejects the whole batch with
    /// `Validation` — zero rows are persisted. An empty description
    /// field is normalized to absent on this path only; direct
    /// create/update store exactly what the caller sent.
    pub async fn import_csv<Rd: Read>(
        &self,
        user_id: i64,
        reader: Rd,
    ) -> LedgerResult<Vec<Operation>> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let mut inputs = Vec::new();
        for (index, record) in csv_reader.deserialize::<CsvRecord>().enumerate() {
            // Line numbering is 1-based and the header occupies line 1.
            let record = record.map_err(|e| LedgerError::Validation {
                message: format!("row {}: {e}", index + 2),
            })?;

            inputs.push(CreateOperation {
                date: record.date,
                kind: record.kind,
                amount: record.amount,
                description: record.description.filter(|d| !d.is_empty()),
            });
        }

        debug!(user_id, rows = inputs.len(), "importing operations from CSV");
        self.operations.create_many(user_id, inputs).await
    }

    /// Export all of a user's operations as CSV, most recent first.
    pub async fn export_csv(&self, user_id: i64) -> LedgerResult<String> {
        let operations = self.operations.list_recent(user_id).await?;

        // Header is written explicitly so an empty export still carries
        // the column names.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer
            .write_record(REPORT_FIELDS)
            .map_err(|e| LedgerError::Internal(format!("csv write: {e}")))?;

        for operation in &operations {
            writer
                .serialize(CsvRecord {
                    date: operation.date,
                    kind: operation.kind,
                    amount: operation.amount,
                    description: operation.description.clone(),
                })
                .map_err(|e| LedgerError::Internal(format!("csv write: {e}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| LedgerError::Internal(format!("csv flush: {e}")))?;

        String::from_utf8(bytes).map_err(|e| LedgerError::Internal(format!("csv encoding: {e}")))
    }
}
