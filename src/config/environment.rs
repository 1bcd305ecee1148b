//! Deployment environment, selecting the `config/{environment}.toml` layer.

use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub const ENV_VAR: &'static str = "MEETAPP_APP_ENV";

    pub const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    /// Reads `MEETAPP_APP_ENV`, falling back to `Development` when unset or
    /// unrecognized.
    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Name of the optional layer loaded on top of `default.toml`.
    pub fn config_file_name(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let alias = match normalized.as_str() {
            "dev" => Some(Environment::Development),
            "stage" => Some(Environment::Staging),
            "prod" => Some(Environment::Production),
            _ => None,
        };

        alias
            .or_else(|| Self::ALL.into_iter().find(|env| env.as_str() == normalized))
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                value: s.to_string(),
                valid: Self::ALL.map(|env| env.as_str()).join(", "),
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
