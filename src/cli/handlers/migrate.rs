//! Migrate command handler
//!
//! Applies, previews or reverts the embedded migrations on a dedicated
//! blocking connection.

use diesel_migrations::MigrationHarness;

use crate::config::settings::Settings;
use crate::db::{MIGRATIONS, establish_sync_connection, run_pending_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// # Arguments
    /// * `dry_run` - Only list pending migrations
    /// * `rollback` - Number of migrations to revert instead of applying
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;

        match (dry_run, rollback) {
            (true, _) => self.show_pending_migrations().await,
            (false, Some(steps)) => self.rollback_migrations(steps).await,
            (false, None) => self.run_migrations().await,
        }
    }

    async fn show_pending_migrations(&self) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let pending = self
            .blocking(|conn| {
                conn.pending_migrations(MIGRATIONS)
                    .map(|pending| {
                        pending
                            .iter()
                            .map(|m| m.name().to_string())
                            .collect::<Vec<_>>()
                    })
                    .map_err(|e| migration_error("check pending migrations", e))
            })
            .await?;

        if pending.is_empty() {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("\nRun without --dry-run to apply these migrations");
        }

        Ok(())
    }

    async fn run_migrations(&self) -> AppResult<()> {
        println!("Running database migrations...");

        let applied = run_pending_migrations(&self.config.database.url).await?;
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }

        Ok(())
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        if steps == 0 {
            return Err(AppError::validation(
                "rollback_steps",
                "Number of rollback steps must be greater than 0",
            ));
        }

        println!("Rolling back {} migration(s)...", steps);

        let reverted = self
            .blocking(move |conn| {
                let applied = conn
                    .applied_migrations()
                    .map_err(|e| migration_error("get applied migrations", e))?;

                if applied.len() < steps as usize {
                    return Err(AppError::validation(
                        "rollback_steps",
                        format!(
                            "Cannot rollback {} migrations - only {} applied migrations available",
                            steps,
                            applied.len()
                        ),
                    ));
                }

                (0..steps)
                    .map(|_| {
                        conn.revert_last_migration(MIGRATIONS)
                            .map(|version| version.to_string())
                            .map_err(|e| migration_error("revert migration", e))
                    })
                    .collect::<AppResult<Vec<_>>>()
            })
            .await?;

        println!("✓ Rolled back {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {}", version);
        }

        Ok(())
    }

    async fn blocking<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut diesel::pg::PgConnection) -> AppResult<T> + Send + 'static,
    {
        let database_url = self.config.database.url.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = establish_sync_connection(&database_url, "establish connection for migrations")?;
            f(&mut conn)
        })
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

fn migration_error(
    operation: &str,
    error: Box<dyn std::error::Error + Send + Sync>,
) -> AppError {
    AppError::Database {
        operation: operation.to_string(),
        source: anyhow::anyhow!("Migration error: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/meetapp_test".to_string();
        config
    }

    #[test]
    fn test_migrate_handler_new() {
        let config = valid_config();
        let handler = MigrateCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_zero_rollback_steps_is_rejected_before_connecting() {
        let handler = MigrateCommandHandler::new(valid_config());

        match handler.execute(false, Some(0)).await {
            Err(AppError::Validation { field, reason }) => {
                assert_eq!(field, "rollback_steps");
                assert!(reason.contains("must be greater than 0"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_database_url_is_rejected() {
        let mut config = valid_config();
        config.database.url = "mysql://localhost/meetapp".to_string();
        let handler = MigrateCommandHandler::new(config);

        assert!(matches!(
            handler.execute(false, None).await,
            Err(AppError::Configuration { .. })
        ));
    }
}
