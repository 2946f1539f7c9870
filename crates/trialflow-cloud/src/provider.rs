//! Cloud provider and executor trait definitions

use crate::error::Result;
use crate::outcome::ProviderOutcome;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trialflow_core::{DeploymentRequest, Provider};

/// Cloud provider abstraction trait
///
/// All cloud providers (AWS, Azure, GCP) implement this trait to provide a
/// unified interface for identity and authentication checks. Resource
/// management itself is owned by the Terraform backend.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Returns the provider this CLI wraps
    fn provider(&self) -> Provider;

    /// Returns the CLI tool the provider is driven through (e.g., "az")
    fn cli_tool(&self) -> &'static str {
        self.provider().cli_tool()
    }

    /// Check if the provider is properly configured and authenticated
    ///
    /// Read-only: only identity queries are issued. An unauthenticated
    /// session is reported through `AuthStatus`, not as an error.
    async fn check_auth(&self) -> Result<AuthStatus>;
}

/// Build the CLI wrapper for a provider
pub fn provider_cli(provider: Provider) -> Box<dyn CloudProvider> {
    match provider {
        Provider::Aws => Box::new(crate::aws::AwsCli::new()),
        Provider::Azure => Box::new(crate::azure::AzureCli::new()),
        Provider::Gcp => Box::new(crate::gcp::GcloudCli::new()),
    }
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Executes one provider's requested action end-to-end
///
/// Implementations must be isolated per provider: a failure inside one
/// `execute` call must never affect a sibling provider's execution. The
/// orchestrator dispatches through this trait either sequentially or as one
/// task per provider.
#[async_trait]
pub trait ProviderExecutor: Send + Sync {
    async fn execute(&self, provider: Provider, request: &DeploymentRequest) -> ProviderOutcome;
}
