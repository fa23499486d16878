use thiserror::Error;

/// Failure to obtain a usable configuration document.
///
/// Any variant is fatal to initialization: the UI shows the message and keeps
/// every control disabled. Nothing retries automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigLoadError {
    #[error("failed to reach the server: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed map data: {0}")]
    Malformed(String),
    #[error("invalid map data: {0}")]
    Invalid(String),
    #[error("server error: {0}")]
    Server(String),
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(e: serde_json::Error) -> Self {
        ConfigLoadError::Malformed(e.to_string())
    }
}
