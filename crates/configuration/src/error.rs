use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load pillar registry from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Registry validation error: {0}")]
    ValidationError(String),
}
