//! Library error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HealthError>;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Invalid resource identity: {0}")]
    InvalidIdentity(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unsupported snapshot format: {0}")]
    UnsupportedSnapshotFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl HealthError {
    pub fn invalid_identity(field: &str) -> Self {
        HealthError::InvalidIdentity(format!("{} must not be empty", field))
    }
}
