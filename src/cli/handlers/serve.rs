//! Serve command handler

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Starts the server, or only validates the configuration on `dry_run`.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config.clone()).run().await?;
        Ok(())
    }

    /// Validates the configuration without touching the network or database.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        let time_zone = self.config.meetups.time_zone()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Meetup dates are truncated to the hour in: {}",
            time_zone.iana_name().unwrap_or(&self.config.meetups.timezone)
        );
        println!(
            "✓ Migrations on startup: {}",
            if self.config.database.auto_migrate { "enabled" } else { "disabled" }
        );
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
