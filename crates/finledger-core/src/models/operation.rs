//! Operation (transaction record) domain model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Income,
    Outcome,
}

/// A single income/outcome transaction belonging to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    /// Owning user id — the sole authorization key for this record.
    pub user_id: i64,
    pub date: NaiveDate,
    pub kind: OperationKind,
    /// Exact decimal amount, two fractional digits.
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Create payload.
///
/// Deliberately carries no user id: ownership is always stamped from
/// the authenticated session, never from client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOperation {
    pub date: NaiveDate,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Update payload — replaces all mutable fields. Same shape as
/// [`CreateOperation`] and likewise without a user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOperation {
    pub date: NaiveDate,
    pub kind: OperationKind,
    pub amount: Decimal,
    pub description: Option<String>,
}
