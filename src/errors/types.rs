use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid flow transition: {0}")]
    InvalidTransition(String),

    #[error("A stop request is already in flight")]
    FlowBusy,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
