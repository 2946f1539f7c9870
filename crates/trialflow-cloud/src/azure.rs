//! Azure CLI wrapper
//!
//! Wraps the `az` CLI for identity checks against the active subscription.

use crate::cli::{run_command, tool_exists};
use crate::error::{CloudError, Result};
use crate::provider::{AuthStatus, CloudProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trialflow_core::Provider;

/// az CLI wrapper
#[derive(Debug, Default)]
pub struct AzureCli;

impl AzureCli {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CloudProvider for AzureCli {
    fn provider(&self) -> Provider {
        Provider::Azure
    }

    async fn check_auth(&self) -> Result<AuthStatus> {
        if !tool_exists("az").await? {
            return Err(CloudError::MissingDependency("az".to_string()));
        }

        match run_command("az", &["account", "show", "--output", "json"]).await {
            Ok(output) => {
                let account: AzureAccount = serde_json::from_str(&output)?;
                let user = account
                    .user
                    .and_then(|u| u.name)
                    .unwrap_or_else(|| "unknown".to_string());
                Ok(AuthStatus::ok(format!("{} ({})", account.name, user)))
            }
            Err(CloudError::CommandFailed(reason)) => Ok(AuthStatus::failed(reason)),
            Err(e) => Err(e),
        }
    }
}

/// Subscription returned by `az account show`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureAccount {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub user: Option<AzureUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureUser {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}
