//! Error types for driver configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read control config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse control config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid control config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
