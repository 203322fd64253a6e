use thiserror::Error;

/// Errors raised while talking to the SheetDB API.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Invalid SheetDB base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Failed to send request to SheetDB: {0}")]
    Request(reqwest::Error),
    #[error("Request to SheetDB timed out: {0}")]
    Timeout(String),
    #[error("SheetDB returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to deserialize SheetDB response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Sheet fetch task failed: {0}")]
    Join(String),
}

impl SheetError {
    /// Classifies a transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SheetError::Timeout(err.to_string())
        } else {
            SheetError::Request(err)
        }
    }
}

impl From<tokio::task::JoinError> for SheetError {
    fn from(err: tokio::task::JoinError) -> Self {
        SheetError::Join(err.to_string())
    }
}

/// Errors raised while loading client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    General(#[from] config::ConfigError),
    #[error("Configuration file not found: {0}")]
    NotFound(String),
}
