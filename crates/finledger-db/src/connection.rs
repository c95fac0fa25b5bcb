//! Connection setup for the WebSocket SurrealDB engine.
//!
//! Settings come from `FINLEDGER_DB_*` environment variables, falling
//! back to local-development defaults. Integration tests bypass this
//! module entirely and use the in-memory engine.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "finledger".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Read `FINLEDGER_DB_URL`, `FINLEDGER_DB_NAMESPACE`,
    /// `FINLEDGER_DB_DATABASE`, `FINLEDGER_DB_USER` and
    /// `FINLEDGER_DB_PASS`, keeping the default for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("FINLEDGER_DB_URL", &defaults.url),
            namespace: env_or("FINLEDGER_DB_NAMESPACE", &defaults.namespace),
            database: env_or("FINLEDGER_DB_DATABASE", &defaults.database),
            username: env_or("FINLEDGER_DB_USER", &defaults.username),
            password: env_or("FINLEDGER_DB_PASS", &defaults.password),
        }
    }
}

/// Open a WebSocket connection, sign in as root, and select the
/// configured namespace and database.
pub async fn connect(config: &DbConfig) -> Result<Surreal<Client>, DbError> {
    info!(
        url = %config.url,
        namespace = %config.namespace,
        database = %config.database,
        "connecting to database"
    );

    let db = Surreal::new::<Ws>(&config.url).await?;

    db.signin(Root {
        username: &config.username,
        password: &config.password,
    })
    .await?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    info!("database connection ready");

    Ok(db)
}
