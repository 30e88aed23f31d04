//! Serverspace provider error types

use fleetflow_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerspaceError {
    /// The API key does not start with a known regional prefix
    #[error("Wrong API key format: expected a key issued by a known Serverspace region")]
    WrongKeyFormat,

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("{0}")]
    Cloud(CloudError),
}

impl ServerspaceError {
    /// Transport-level failure worth retrying on an idempotent request
    pub fn is_transient(&self) -> bool {
        match self {
            ServerspaceError::Http(e) => e.is_connect() || e.is_timeout(),
            ServerspaceError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ServerspaceError::Cloud(e) if e.is_timeout())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ServerspaceError::Cloud(e) if e.is_cancelled())
    }
}

/// Transport errors that crossed the poller come back unboxed
impl From<CloudError> for ServerspaceError {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::Transport(source) => match source.downcast::<ServerspaceError>() {
                Ok(inner) => *inner,
                Err(source) => ServerspaceError::Cloud(CloudError::Transport(source)),
            },
            other => ServerspaceError::Cloud(other),
        }
    }
}

impl From<ServerspaceError> for CloudError {
    fn from(err: ServerspaceError) -> Self {
        match err {
            ServerspaceError::Cloud(inner) => inner,
            other => CloudError::transport(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerspaceError>;
