//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Operation queries require a
//! `user_id` parameter: the store restricts every read and write to the
//! owning user, so a row belonging to someone else is indistinguishable
//! from a row that does not exist.

use crate::error::LedgerResult;
use crate::models::operation::{CreateOperation, Operation, OperationKind, UpdateOperation};
use crate::models::user::{CreateUser, User};

pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Conflict` if the email or
    /// username is already taken (store-level uniqueness constraint).
    fn insert(&self, input: CreateUser) -> impl Future<Output = LedgerResult<User>> + Send;

    fn get_by_username(&self, username: &str) -> impl Future<Output = LedgerResult<User>> + Send;
}

pub trait OperationRepository: Send + Sync {
    /// Owner is stamped from `user_id`; the payload cannot override it.
    fn create(
        &self,
        user_id: i64,
        input: CreateOperation,
    ) -> impl Future<Output = LedgerResult<Operation>> + Send;

    /// All-or-nothing batch insert inside one store transaction: if
    /// persistence fails partway, no partial set is visible.
    fn create_many(
        &self,
        user_id: i64,
        inputs: Vec<CreateOperation>,
    ) -> impl Future<Output = LedgerResult<Vec<Operation>>> + Send;

    /// Fails with `NotFound` unless a row matches BOTH id and owner.
    fn get(&self, user_id: i64, id: i64) -> impl Future<Output = LedgerResult<Operation>> + Send;

    /// Store-natural order, optionally restricted to one kind.
    fn list(
        &self,
        user_id: i64,
        kind: Option<OperationKind>,
    ) -> impl Future<Output = LedgerResult<Vec<Operation>>> + Send;

    /// Canonical "recent first" listing: date descending, ties broken
    /// by id descending.
    fn list_recent(&self, user_id: i64)
    -> impl Future<Output = LedgerResult<Vec<Operation>>> + Send;

    /// Replaces all mutable fields atomically; same ownership rule as
    /// [`get`](Self::get).
    fn update(
        &self,
        user_id: i64,
        id: i64,
        input: UpdateOperation,
    ) -> impl Future<Output = LedgerResult<Operation>> + Send;

    /// Deleting a missing or non-owned id is an indistinguishable
    /// `NotFound`.
    fn delete(&self, user_id: i64, id: i64) -> impl Future<Output = LedgerResult<()>> + Send;
}
