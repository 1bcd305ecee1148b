//! Errors raised while loading or validating meetapp settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `MEETAPP_APP_ENV` or `--env` named no known environment
    #[error("Unknown environment '{value}'. Valid values are: {valid}")]
    UnknownEnvironment { value: String, valid: String },

    /// `meetups.timezone` is neither `system`, `UTC` nor a known IANA zone
    #[error("Unknown timezone '{name}' in meetups.timezone: {reason}")]
    InvalidTimeZone { name: String, reason: String },

    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }

    /// Settings key the error is about, as reported in API error bodies.
    pub fn key(&self) -> &str {
        match self {
            ConfigError::ValidationError { field, .. } => field,
            ConfigError::UnknownEnvironment { .. } => "app_env",
            ConfigError::InvalidTimeZone { .. } => "meetups.timezone",
            ConfigError::FileNotFound(_) | ConfigError::MutualExclusivityError(_) => "config_file",
            ConfigError::ParseError(_) | ConfigError::Other(_) => "settings",
        }
    }
}
