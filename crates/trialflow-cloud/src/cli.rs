//! Shared helpers for invoking external cloud CLIs

use crate::error::{CloudError, Result};
use std::process::Stdio;
use tokio::process::Command;

/// Check if a CLI tool exists on PATH
pub async fn tool_exists(tool: &str) -> Result<bool> {
    let which = Command::new("which").arg(tool).output().await?;
    Ok(which.status.success())
}

/// Run an external command and return stdout
///
/// A non-zero exit status is mapped to `CloudError::CommandFailed` carrying
/// the captured stderr.
pub async fn run_command(tool: &str, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new(tool);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    tracing::debug!("Running: {} {}", tool, args.join(" "));

    let output = cmd.output().await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CloudError::CommandFailed(format!(
            "{} {}: {}",
            tool,
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
