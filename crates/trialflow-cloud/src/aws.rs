//! AWS CLI wrapper
//!
//! Wraps the `aws` CLI for identity checks against the active session.

use crate::cli::{run_command, tool_exists};
use crate::error::{CloudError, Result};
use crate::provider::{AuthStatus, CloudProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trialflow_core::Provider;

/// aws CLI wrapper
#[derive(Debug, Default)]
pub struct AwsCli;

impl AwsCli {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CloudProvider for AwsCli {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    async fn check_auth(&self) -> Result<AuthStatus> {
        if !tool_exists("aws").await? {
            return Err(CloudError::MissingDependency("aws".to_string()));
        }

        match run_command("aws", &["sts", "get-caller-identity", "--output", "json"]).await {
            Ok(output) => {
                let identity: CallerIdentity = serde_json::from_str(&output)?;
                Ok(AuthStatus::ok(format!(
                    "{} ({})",
                    identity.arn, identity.account
                )))
            }
            Err(CloudError::CommandFailed(reason)) => Ok(AuthStatus::failed(reason)),
            Err(e) => Err(e),
        }
    }
}

/// Identity returned by `aws sts get-caller-identity`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "UserId")]
    pub user_id: String,

    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "Arn")]
    pub arn: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_identity_decoding() {
        let json = r#"{
            "UserId": "AIDAEXAMPLE",
            "Account": "123456789012",
            "Arn": "arn:aws:iam::123456789012:user/ops"
        }"#;

        let identity: CallerIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.account, "123456789012");
        assert_eq!(identity.arn, "arn:aws:iam::123456789012:user/ops");
    }
}
