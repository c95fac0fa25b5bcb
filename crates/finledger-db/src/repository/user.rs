//! SurrealDB implementation of [`UserRepository`].
//!
//! The store only ever sees password hashes — plaintext passwords are
//! hashed in the auth layer before they reach `insert`. Uniqueness of
//! email and username is enforced by the schema's UNIQUE indexes and
//! surfaced as `Conflict`.

use finledger_core::error::LedgerResult;
use finledger_core::models::user::{CreateUser, User};
use finledger_core::repository::UserRepository;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};

use crate::error::{DbError, classify_insert_error};
use crate::repository::ids::next_id;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, Deserialize)]
struct UserRow {
    email: String,
    username: String,
    password_hash: String,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct UserRowWithId {
    record_id: i64,
    email: String,
    username: String,
    password_hash: String,
}

impl UserRow {
    fn into_user(self, id: i64) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

impl UserRowWithId {
    fn into_user(self) -> User {
        User {
            id: self.record_id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn insert(&self, input: CreateUser) -> LedgerResult<User> {
        let id = next_id(&self.db, "user").await?;

        let result = self
            .db
            .query(
                "CREATE type::thing('user', $id) SET \
                 email = $email, \
                 username = $username, \
                 password_hash = $password_hash",
            )
            .bind(("id", id))
            .bind(("email", input.email))
            .bind(("username", input.username))
            .bind(("password_hash", input.password_hash))
            .await
            .map_err(DbError::from)?;

        // A duplicate email or username fails the UNIQUE index here.
        let mut result = result
            .check()
            .map_err(|e| classify_insert_error(e, "user"))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_user(id))
    }

    async fn get_by_username(&self, username: &str) -> LedgerResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.into_user())
    }
}
