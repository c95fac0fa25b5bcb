//! finledger server — application entry point.
//!
//! Wires configuration, the database connection, and the service layer
//! together. The HTTP transport is not part of this crate.

use finledger_auth::{AuthConfig, AuthService};
use finledger_db::DbConfig;
use finledger_db::repository::{SurrealOperationRepository, SurrealUserRepository};
use finledger_ops::{OperationService, ReportService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("finledger=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting finledger server...");

    let jwt_secret = match std::env::var("FINLEDGER_JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            tracing::error!("FINLEDGER_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };

    let db = match finledger_db::connect(&DbConfig::from_env()).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = finledger_db::run_migrations(&db).await {
        tracing::error!(error = %e, "schema migration failed");
        std::process::exit(1);
    }

    let auth_config = AuthConfig {
        jwt_secret,
        ..AuthConfig::default()
    };

    let _auth = AuthService::new(SurrealUserRepository::new(db.clone()), auth_config);
    let operations = OperationService::new(SurrealOperationRepository::new(db));
    let _reports = ReportService::new(operations.clone());

    tracing::info!("services initialized");
    tracing::info!("finledger server stopped.");
}
