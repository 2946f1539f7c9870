//! Cloud orchestration error types

use thiserror::Error;

/// Cloud orchestration errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Missing dependency: {0} is not installed or not on PATH")]
    MissingDependency(String),

    #[error("Provider {provider} is not authenticated: {reason}")]
    NotAuthenticated { provider: String, reason: String },

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
