use thiserror::Error;

pub type OctoResult<T> = Result<T, OctoError>;

#[derive(Error, Debug)]
pub enum OctoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to load variable catalog for Octopus {version}: {reason}")]
    CatalogLoad { version: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
