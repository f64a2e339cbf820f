use thiserror::Error;

/// Failures raised by local persistence: configuration and the token file.
#[derive(Debug, Error)]
pub enum SpendlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
