//! terraform CLI wrapper
//!
//! Wraps the terraform CLI commands against one working directory. All
//! invocations are non-interactive (`-input=false`); confirmation happens a
//! layer above, before terraform is asked to mutate anything.

use crate::error::{Result, TerraformError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// terraform CLI wrapper bound to one configuration directory
pub struct Terraform {
    working_dir: PathBuf,
}

impl Terraform {
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run terraform and return the raw output, whatever the exit status
    async fn exec(&self, args: &[&str]) -> Result<std::process::Output> {
        let mut cmd = Command::new("terraform");
        cmd.current_dir(&self.working_dir);
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(
            dir = %self.working_dir.display(),
            "Running: terraform {}",
            args.join(" ")
        );

        Ok(cmd.output().await?)
    }

    /// Run terraform, mapping a non-zero exit status to an error
    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.exec(args).await?;

        if !output.status.success() {
            return Err(TerraformError::CommandFailed {
                command: args.first().unwrap_or(&"").to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// `terraform init` — idempotent, safe to repeat
    pub async fn init(&self) -> Result<()> {
        self.run(&["init", "-input=false", "-no-color"]).await?;
        Ok(())
    }

    /// `terraform validate -json` — syntax/semantic check, never touches
    /// remote state
    ///
    /// terraform exits non-zero for an invalid configuration but still emits
    /// the JSON report, so the report is decoded regardless of exit status.
    pub async fn validate(&self) -> Result<ValidateOutput> {
        let output = self.exec(&["validate", "-json", "-no-color"]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        match serde_json::from_str::<ValidateOutput>(&stdout) {
            Ok(report) => Ok(report),
            Err(_) if !output.status.success() => Err(TerraformError::CommandFailed {
                command: "validate".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// `terraform plan -detailed-exitcode` — computes a diff, never mutates
    pub async fn plan(&self) -> Result<PlanStatus> {
        let output = self
            .exec(&["plan", "-input=false", "-detailed-exitcode", "-no-color"])
            .await?;

        match classify_plan_exit(output.status.code()) {
            Some(status) => Ok(status),
            None => Err(TerraformError::CommandFailed {
                command: "plan".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    /// `terraform apply` — mutates remote infrastructure
    pub async fn apply(&self) -> Result<()> {
        self.run(&["apply", "-input=false", "-auto-approve", "-no-color"])
            .await?;
        Ok(())
    }

    /// `terraform destroy` — tears remote infrastructure down
    pub async fn destroy(&self) -> Result<()> {
        self.run(&["destroy", "-input=false", "-auto-approve", "-no-color"])
            .await?;
        Ok(())
    }

    /// `terraform output -json` — reads published values
    pub async fn output(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        let stdout = self.run(&["output", "-json", "-no-color"]).await?;
        let outputs: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&stdout)?;
        Ok(outputs)
    }
}

/// Classify `terraform plan -detailed-exitcode`: 0 = no changes, 2 = changes
/// pending, anything else is a failure
pub fn classify_plan_exit(code: Option<i32>) -> Option<PlanStatus> {
    match code {
        Some(0) => Some(PlanStatus::NoChanges),
        Some(2) => Some(PlanStatus::ChangesPending),
        _ => None,
    }
}

/// Outcome of a successful plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    NoChanges,
    ChangesPending,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::NoChanges => write!(f, "no changes"),
            PlanStatus::ChangesPending => write!(f, "changes pending"),
        }
    }
}

/// Report emitted by `terraform validate -json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    pub valid: bool,

    #[serde(default)]
    pub error_count: u32,

    #[serde(default)]
    pub warning_count: u32,

    #[serde(default)]
    pub diagnostics: Vec<ValidateDiagnostic>,
}

impl ValidateOutput {
    /// One-line summary of the diagnostics for the run report
    pub fn summary(&self) -> String {
        if self.valid {
            "configuration valid".to_string()
        } else {
            let summaries: Vec<&str> = self
                .diagnostics
                .iter()
                .filter(|d| d.severity.as_deref() == Some("error"))
                .map(|d| d.summary.as_str())
                .collect();
            format!(
                "{} error(s): {}",
                self.error_count,
                summaries.join("; ")
            )
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateDiagnostic {
    #[serde(default)]
    pub severity: Option<String>,

    pub summary: String,

    #[serde(default)]
    pub detail: Option<String>,
}
