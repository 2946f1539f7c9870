//! Terraform wrapper error types

use thiserror::Error;

/// Terraform CLI errors
#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("terraform {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TerraformError>;
