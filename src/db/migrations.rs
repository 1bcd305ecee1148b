//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::AppError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies pending migrations on a dedicated blocking connection.
///
/// Returns the versions that were applied.
pub async fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, AppError> {
    let database_url = database_url.to_string();

    tokio::task::spawn_blocking(move || {
        let mut conn = establish_sync_connection(&database_url, "run pending migrations")?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::Database {
                operation: "run pending migrations".to_string(),
                source: anyhow::anyhow!("Migration error: {}", e),
            })?;

        Ok(applied.iter().map(|version| version.to_string()).collect())
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}

pub(crate) fn establish_sync_connection(
    database_url: &str,
    operation: &str,
) -> Result<PgConnection, AppError> {
    PgConnection::establish(database_url).map_err(|e| AppError::Database {
        operation: operation.to_string(),
        source: anyhow::anyhow!("Connection error: {}", e),
    })
}
