//! Per-provider Terraform executor
//!
//! Runs one provider's requested action end-to-end: resolve the provider's
//! configuration directory, initialize the backend, then execute the action.
//! Any step failure short-circuits the remaining steps for that provider only
//! and is reported as a terminal `ProviderOutcome`; sibling providers are
//! never affected.

use crate::runner::Terraform;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use trialflow_cloud::{Confirm, OutcomeStatus, ProviderExecutor, ProviderOutcome, StdinConfirm};
use trialflow_core::{Action, DeploymentRequest, Platform, Provider};

/// `ProviderExecutor` backed by the terraform CLI
pub struct TerraformExecutor {
    project_root: PathBuf,
    platform: Platform,
    confirmer: Arc<dyn Confirm>,
}

impl TerraformExecutor {
    pub fn new(project_root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            project_root: project_root.into(),
            platform,
            confirmer: Arc::new(StdinConfirm),
        }
    }

    /// Replace the confirmation seam (tests, pre-resolved approval)
    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirm>) -> Self {
        self.confirmer = confirmer;
        self
    }

    fn approved(&self, provider: Provider, request: &DeploymentRequest) -> bool {
        if !request.needs_confirmation() {
            return true;
        }
        // 確認はデフォルトで中止側に倒す
        let prompt = format!(
            "{} を {} 環境のプロバイダー '{}' に対して実行しますか？",
            request.action, request.environment, provider
        );
        self.confirmer.confirm(&prompt)
    }
}

#[async_trait]
impl ProviderExecutor for TerraformExecutor {
    async fn execute(&self, provider: Provider, request: &DeploymentRequest) -> ProviderOutcome {
        // 1. 構成ディレクトリの解決
        let dir = self
            .platform
            .config_dir(&self.project_root, request.environment, provider);
        if !dir.is_dir() {
            return ProviderOutcome::new(
                provider,
                OutcomeStatus::ConfigNotFound,
                format!("configuration directory not found: {}", dir.display()),
            );
        }

        // 2. 確認（破壊的アクションのみ。initの前に行い、中止なら何も触らない）
        if !self.approved(provider, request) {
            return ProviderOutcome::new(
                provider,
                OutcomeStatus::UserAborted,
                "confirmation declined",
            );
        }

        let terraform = Terraform::new(&dir);

        // 3. バックエンド初期化（冪等）
        if let Err(e) = terraform.init().await {
            return ProviderOutcome::new(
                provider,
                OutcomeStatus::ExecutionFailed,
                format!("init failed: {}", e),
            );
        }

        // 4. アクション実行
        match request.action {
            Action::Validate => match terraform.validate().await {
                Ok(report) if report.valid => ProviderOutcome::success(provider, report.summary()),
                Ok(report) => ProviderOutcome::new(
                    provider,
                    OutcomeStatus::ValidationFailed,
                    report.summary(),
                ),
                Err(e) => ProviderOutcome::new(
                    provider,
                    OutcomeStatus::ExecutionFailed,
                    e.to_string(),
                ),
            },
            Action::Plan => match terraform.plan().await {
                Ok(status) => ProviderOutcome::success(provider, status.to_string()),
                Err(e) => ProviderOutcome::new(
                    provider,
                    OutcomeStatus::ExecutionFailed,
                    e.to_string(),
                ),
            },
            Action::Apply => match terraform.apply().await {
                Ok(()) => ProviderOutcome::success(provider, "applied"),
                Err(e) => ProviderOutcome::new(
                    provider,
                    OutcomeStatus::ExecutionFailed,
                    e.to_string(),
                ),
            },
            Action::Destroy => match terraform.destroy().await {
                Ok(()) => ProviderOutcome::success(provider, "destroyed"),
                Err(e) => ProviderOutcome::new(
                    provider,
                    OutcomeStatus::ExecutionFailed,
                    e.to_string(),
                ),
            },
            Action::Output => match terraform.output().await {
                Ok(outputs) => {
                    let rendered = serde_json::to_string_pretty(&outputs)
                        .unwrap_or_else(|_| "{}".to_string());
                    ProviderOutcome::success(provider, rendered)
                }
                Err(e) => ProviderOutcome::new(
                    provider,
                    OutcomeStatus::ExecutionFailed,
                    e.to_string(),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialflow_cloud::{AutoApprove, Deny};
    use trialflow_core::Environment;

    fn test_platform() -> Platform {
        trialflow_core::parse_platform(
            r#"
platform "clinical-trials"

environment "dev" {
    providers "aws" "azure" "gcp"
}
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_config_dir_is_config_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = TerraformExecutor::new(temp_dir.path(), test_platform());

        let request =
            DeploymentRequest::new(Environment::Dev, vec![Provider::Aws], Action::Plan).unwrap();

        let outcome = executor.execute(Provider::Aws, &request).await;
        assert_eq!(outcome.status, OutcomeStatus::ConfigNotFound);
        assert!(outcome.message.contains("terraform/environments/dev/aws"));
    }

    #[tokio::test]
    async fn test_declined_apply_is_user_aborted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("terraform/environments/dev/aws");
        std::fs::create_dir_all(&dir).unwrap();

        let executor = TerraformExecutor::new(temp_dir.path(), test_platform())
            .with_confirmer(Arc::new(Deny));

        let request =
            DeploymentRequest::new(Environment::Dev, vec![Provider::Aws], Action::Apply).unwrap();

        // 中止された場合はterraformに一切触れずに終わる
        let outcome = executor.execute(Provider::Aws, &request).await;
        assert_eq!(outcome.status, OutcomeStatus::UserAborted);
    }

    #[tokio::test]
    async fn test_declined_destroy_is_user_aborted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("terraform/environments/dev/gcp");
        std::fs::create_dir_all(&dir).unwrap();

        let executor = TerraformExecutor::new(temp_dir.path(), test_platform())
            .with_confirmer(Arc::new(Deny));

        let request =
            DeploymentRequest::new(Environment::Dev, vec![Provider::Gcp], Action::Destroy)
                .unwrap();

        let outcome = executor.execute(Provider::Gcp, &request).await;
        assert_eq!(outcome.status, OutcomeStatus::UserAborted);
    }

    #[tokio::test]
    async fn test_auto_approve_skips_confirmation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("terraform/environments/dev/aws");
        std::fs::create_dir_all(&dir).unwrap();

        // Denyでもauto_approveなら確認に到達しない
        let executor = TerraformExecutor::new(temp_dir.path(), test_platform())
            .with_confirmer(Arc::new(Deny));

        let request =
            DeploymentRequest::new(Environment::Dev, vec![Provider::Aws], Action::Apply)
                .unwrap()
                .with_auto_approve(true);

        let outcome = executor.execute(Provider::Aws, &request).await;
        assert_ne!(outcome.status, OutcomeStatus::UserAborted);
    }

    #[tokio::test]
    async fn test_read_only_actions_never_prompt() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("terraform/environments/dev/azure");
        std::fs::create_dir_all(&dir).unwrap();

        let executor = TerraformExecutor::new(temp_dir.path(), test_platform())
            .with_confirmer(Arc::new(Deny));

        for action in [Action::Validate, Action::Plan, Action::Output] {
            let request =
                DeploymentRequest::new(Environment::Dev, vec![Provider::Azure], action).unwrap();
            let outcome = executor.execute(Provider::Azure, &request).await;
            assert_ne!(
                outcome.status,
                OutcomeStatus::UserAborted,
                "read-only action {} must not prompt",
                action
            );
        }
    }

    #[test]
    fn test_approval_logic() {
        let temp_dir = tempfile::tempdir().unwrap();

        let denying = TerraformExecutor::new(temp_dir.path(), test_platform())
            .with_confirmer(Arc::new(Deny));
        let approving = TerraformExecutor::new(temp_dir.path(), test_platform())
            .with_confirmer(Arc::new(AutoApprove));

        let apply =
            DeploymentRequest::new(Environment::Dev, vec![Provider::Aws], Action::Apply).unwrap();
        let plan =
            DeploymentRequest::new(Environment::Dev, vec![Provider::Aws], Action::Plan).unwrap();

        assert!(!denying.approved(Provider::Aws, &apply));
        assert!(approving.approved(Provider::Aws, &apply));
        assert!(denying.approved(Provider::Aws, &plan));
        assert!(
            denying.approved(Provider::Aws, &apply.clone().with_auto_approve(true))
        );
    }
}
