//! Google Cloud CLI wrapper
//!
//! Wraps the `gcloud` CLI for identity checks against active credentials.

use crate::cli::{run_command, tool_exists};
use crate::error::{CloudError, Result};
use crate::provider::{AuthStatus, CloudProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trialflow_core::Provider;

/// gcloud CLI wrapper
#[derive(Debug, Default)]
pub struct GcloudCli;

impl GcloudCli {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CloudProvider for GcloudCli {
    fn provider(&self) -> Provider {
        Provider::Gcp
    }

    async fn check_auth(&self) -> Result<AuthStatus> {
        if !tool_exists("gcloud").await? {
            return Err(CloudError::MissingDependency("gcloud".to_string()));
        }

        match run_command(
            "gcloud",
            &[
                "auth",
                "list",
                "--filter=status:ACTIVE",
                "--format=json",
            ],
        )
        .await
        {
            Ok(output) => {
                let accounts: Vec<GcloudAccount> = if output.trim().is_empty() {
                    Vec::new()
                } else {
                    serde_json::from_str(&output)?
                };

                match accounts.first() {
                    Some(active) => Ok(AuthStatus::ok(active.account.clone())),
                    None => Ok(AuthStatus::failed(
                        "no active gcloud credentials (run `gcloud auth login`)",
                    )),
                }
            }
            Err(CloudError::CommandFailed(reason)) => Ok(AuthStatus::failed(reason)),
            Err(e) => Err(e),
        }
    }
}

/// Credential entry returned by `gcloud auth list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcloudAccount {
    pub account: String,

    #[serde(default)]
    pub status: Option<String>,
}
