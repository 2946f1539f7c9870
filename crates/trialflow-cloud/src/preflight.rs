//! Prerequisite checks
//!
//! Verifies required CLI tools and cloud authentication before any provider
//! executor starts. Fails fast with a distinct error naming the missing tool
//! or unauthenticated provider. Read-only: only identity queries are issued.

use crate::cli::tool_exists;
use crate::error::{CloudError, Result};
use crate::provider::provider_cli;
use trialflow_core::Provider;

/// Verify that a CLI tool is installed
pub async fn ensure_tool(tool: &str) -> Result<()> {
    if tool_exists(tool).await? {
        tracing::debug!(tool, "Tool found");
        Ok(())
    } else {
        Err(CloudError::MissingDependency(tool.to_string()))
    }
}

/// Run all prerequisite checks for a provider selection
///
/// Checks required tools first, then each provider's CLI presence and
/// authenticated session, in canonical provider order.
pub async fn preflight_check(providers: &[Provider], required_tools: &[String]) -> Result<()> {
    for tool in required_tools {
        ensure_tool(tool).await?;
    }

    for provider in providers {
        let cli = provider_cli(*provider);
        ensure_tool(cli.cli_tool()).await?;

        let auth = cli.check_auth().await?;
        if !auth.authenticated {
            return Err(CloudError::NotAuthenticated {
                provider: provider.to_string(),
                reason: auth
                    .error
                    .unwrap_or_else(|| "no active session".to_string()),
            });
        }
        tracing::info!(
            provider = provider.as_str(),
            account = auth.account_info.as_deref().unwrap_or("unknown"),
            "Provider authenticated"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_tool_missing() {
        let err = ensure_tool("definitely-not-a-real-cli-tool-xyz")
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::MissingDependency(_)));
    }

    #[tokio::test]
    async fn test_ensure_tool_present() {
        // `sh` はPOSIX環境に必ず存在する
        ensure_tool("sh").await.unwrap();
    }

    #[tokio::test]
    async fn test_preflight_fails_on_missing_required_tool() {
        let err = preflight_check(&[], &["definitely-not-a-real-cli-tool-xyz".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CloudError::MissingDependency(_)));
    }
}
