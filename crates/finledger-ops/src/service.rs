//! Operation service — the CRUD surface exposed to callers.
//!
//! Every method takes the authenticated user's id as its first
//! argument; the payload types carry no user id at all, so ownership
//! can only ever come from the session. The store enforces the matching
//! read-side restriction.

use finledger_core::error::LedgerResult;
use finledger_core::models::operation::{
    CreateOperation, Operation, OperationKind, UpdateOperation,
};
use finledger_core::repository::OperationRepository;
use tracing::debug;

/// Operation service.
///
/// Generic over the repository implementation so this layer has no
/// dependency on the database crate.
#[derive(Clone)]
pub struct OperationService<R: OperationRepository> {
    operations: R,
}

impl<R: OperationRepository> OperationService<R> {
    pub fn new(operations: R) -> Self {
        Self { operations }
    }

    /// List operations in store-natural order, optionally restricted to
    /// one kind.
    pub async fn list(
        &self,
        user_id: i64,
        kind: Option<OperationKind>,
    ) -> LedgerResult<Vec<Operation>> {
        self.operations.list(user_id, kind).await
    }

    /// List operations most recent first (date desc, id desc).
    pub async fn list_recent(&self, user_id: i64) -> LedgerResult<Vec<Operation>> {
        self.operations.list_recent(user_id).await
    }

    /// Fails with `NotFound` unless the record exists AND belongs to
    /// `user_id`.
    pub async fn get(&self, user_id: i64, operation_id: i64) -> LedgerResult<Operation> {
        self.operations.get(user_id, operation_id).await
    }

    pub async fn create(&self, user_id: i64, input: CreateOperation) -> LedgerResult<Operation> {
        let operation = self.operations.create(user_id, input).await?;
        debug!(user_id, operation_id = operation.id, "created operation");
        Ok(operation)
    }

    /// All-or-nothing batch create; used by the CSV import path.
    pub async fn create_many(
        &self,
        user_id: i64,
        inputs: Vec<CreateOperation>,
    ) -> LedgerResult<Vec<Operation>> {
        let operations = self.operations.create_many(user_id, inputs).await?;
        debug!(user_id, count = operations.len(), "created operation batch");
        Ok(operations)
    }

    /// Replaces all mutable fields; same ownership rule as
    /// [`get`](Self::get).
    pub async fn update(
        &self,
        user_id: i64,
        operation_id: i64,
        input: UpdateOperation,
    ) -> LedgerResult<Operation> {
        self.operations.update(user_id, operation_id, input).await
    }

    /// Deleting a missing or non-owned record is an indistinguishable
    /// `NotFound`.
    pub async fn delete(&self, user_id: i64, operation_id: i64) -> LedgerResult<()> {
        self.operations.delete(user_id, operation_id).await?;
        debug!(user_id, operation_id, "deleted operation");
        Ok(())
    }
}
