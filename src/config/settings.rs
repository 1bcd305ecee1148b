//! Configuration settings structures for meetapp
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "meetapp".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_request_timeout() -> u64 {
    30
}

fn default_keep_alive_timeout() -> u64 {
    75
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/meetapp.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_access_token_expiration() -> i64 {
    24
}

fn default_refresh_token_expiration() -> i64 {
    168 // 7 days
}

fn default_timezone() -> String {
    "system".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            keep_alive_timeout: default_keep_alive_timeout(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Run pending migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// JWT Configuration
// ============================================================================

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret; set through `MEETAPP_JWT__SECRET` in production
    #[serde(default)]
    pub secret: String,

    /// Access token lifetime in hours
    #[serde(default = "default_access_token_expiration")]
    pub access_token_expiration: i64,

    /// Refresh token lifetime in hours
    #[serde(default = "default_refresh_token_expiration")]
    pub refresh_token_expiration: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiration: default_access_token_expiration(),
            refresh_token_expiration: default_refresh_token_expiration(),
        }
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret cannot be empty",
            ));
        }

        if self.secret.len() < 32 {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret should be at least 32 characters",
            ));
        }

        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be positive",
            ));
        }

        if self.refresh_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.refresh_token_expiration",
                "Refresh token expiration must be positive",
            ));
        }

        if self.access_token_expiration >= self.refresh_token_expiration {
            return Err(ConfigError::validation(
                "jwt",
                "Refresh token expiration should be longer than access token expiration",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// "full", "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// "trace", "debug", "info", "warn" or "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Converts the file representation into the runtime `LoggerConfig`.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = self.file.into_file_config()?;

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::validation("logger".to_string(), e.to_string()))
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format".to_string(), e.to_string()))?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format)
            .map_err(|e| ConfigError::validation("logger.file".to_string(), e.to_string()))
    }
}

// ============================================================================
// Meetups Configuration
// ============================================================================

/// Meetup business rule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupsConfig {
    /// IANA timezone used for hour truncation and day ranges, or "system"
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for MeetupsConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl MeetupsConfig {
    /// Resolves the configured timezone.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        if self.timezone.eq_ignore_ascii_case("system") {
            return Ok(TimeZone::system());
        }
        if self.timezone.eq_ignore_ascii_case("UTC") {
            return Ok(TimeZone::UTC);
        }

        TimeZone::get(&self.timezone).map_err(|e| ConfigError::InvalidTimeZone {
            name: self.timezone.clone(),
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub meetups: MeetupsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_server_config() -> impl Strategy<Value = ServerConfig> {
        ("[a-z0-9.]{1,20}", 1u16..=65535, 1u64..=600, 1u64..=600).prop_map(
            |(host, port, request_timeout, keep_alive_timeout)| ServerConfig {
                host,
                port,
                request_timeout,
                keep_alive_timeout,
            },
        )
    }

    fn arb_jwt_config() -> impl Strategy<Value = JwtConfig> {
        ("[a-zA-Z0-9]{32,64}", 1i64..=48, 49i64..=720).prop_map(
            |(secret, access_token_expiration, refresh_token_expiration)| JwtConfig {
                secret,
                access_token_expiration,
                refresh_token_expiration,
            },
        )
    }

    fn arb_meetups_config() -> impl Strategy<Value = MeetupsConfig> {
        prop::sample::select(vec!["system", "UTC", "America/Sao_Paulo", "Europe/Lisbon"])
            .prop_map(|tz| MeetupsConfig {
                timezone: tz.to_string(),
            })
    }

    fn arb_settings() -> impl Strategy<Value = Settings> {
        (arb_server_config(), arb_jwt_config(), arb_meetups_config()).prop_map(
            |(server, jwt, meetups)| Settings {
                server,
                jwt,
                meetups,
                ..Settings::default()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_settings_round_trip_serialization(settings in arb_settings()) {
            let toml_str = toml::to_string(&settings).expect("Settings should serialize to TOML");
            let deserialized: Settings =
                toml::from_str(&toml_str).expect("TOML should deserialize back to Settings");
            prop_assert_eq!(settings, deserialized);
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.application.name, "meetapp");
        assert_eq!(settings.application.version, crate::pkg_version());
        assert_eq!(settings.server.address(), "127.0.0.1:3333");
        assert_eq!(settings.database.max_connections, 10);
        assert!(!settings.database.auto_migrate);
        assert_eq!(settings.jwt.access_token_expiration, 24);
        assert_eq!(settings.jwt.refresh_token_expiration, 168);
        assert_eq!(settings.logger.level, "info");
        assert_eq!(settings.meetups.timezone, "system");
    }

    #[test]
    fn test_jwt_config_validate() {
        let valid = JwtConfig {
            secret: "a".repeat(32),
            ..JwtConfig::default()
        };
        assert!(valid.validate().is_ok());

        let short = JwtConfig {
            secret: "short".to_string(),
            ..JwtConfig::default()
        };
        assert!(matches!(
            short.validate(),
            Err(ConfigError::ValidationError { field, .. }) if field == "jwt.secret"
        ));

        let inverted = JwtConfig {
            secret: "a".repeat(32),
            access_token_expiration: 200,
            refresh_token_expiration: 100,
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::ValidationError { field, .. }) if field == "jwt"
        ));
    }

    #[test]
    fn test_meetups_time_zone() {
        let utc = MeetupsConfig {
            timezone: "UTC".to_string(),
        };
        assert_eq!(utc.time_zone().unwrap().iana_name(), Some("UTC"));

        let system = MeetupsConfig::default();
        assert!(system.time_zone().is_ok());

        let unknown = MeetupsConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
        };
        assert!(matches!(
            unknown.time_zone(),
            Err(ConfigError::InvalidTimeZone { ref name, .. }) if name == "Mars/Olympus_Mons"
        ));
    }

    #[test]
    fn test_logger_settings_into_config() {
        let settings = LoggerSettings {
            file: FileSettings {
                format: "compact".to_string(),
                ..FileSettings::default()
            },
            ..LoggerSettings::default()
        };
        let config = settings.into_logger_config().unwrap();
        assert_eq!(config.file.format, LogFormat::Compact);

        let bad = LoggerSettings {
            file: FileSettings {
                format: "xml".to_string(),
                ..FileSettings::default()
            },
            ..LoggerSettings::default()
        };
        assert!(bad.into_logger_config().is_err());
    }
}
