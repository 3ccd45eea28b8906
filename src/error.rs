use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AwakeError {
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("HTTP request error: {0}")]
    RequestError(String),

    #[error("Ping to {0} timed out")]
    Timeout(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),
}

// Utility methods for error conversion
impl AwakeError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        AwakeError::RequestError(err.to_string())
    }

    pub fn from_serde_error(err: serde_json::Error) -> Self {
        AwakeError::JsonError(err.to_string())
    }
}

// From trait implementations for common error types
impl From<reqwest::Error> for AwakeError {
    fn from(err: reqwest::Error) -> Self {
        Self::from_reqwest_error(err)
    }
}

impl From<serde_json::Error> for AwakeError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_serde_error(err)
    }
}

impl From<std::io::Error> for AwakeError {
    fn from(err: std::io::Error) -> Self {
        AwakeError::IoError(err.to_string())
    }
}

impl From<std::env::VarError> for AwakeError {
    fn from(err: std::env::VarError) -> Self {
        AwakeError::ConfigError(format!("Environment variable error: {}", err))
    }
}
