use crate::report;
use crate::utils;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use trialflow_cloud::{
    Confirm, Orchestrator, OutcomeStatus, ProviderOutcome, RunResult, StdinConfirm,
    preflight_check,
};
use trialflow_core::{
    Action, CloudSelector, DeploymentRequest, Environment, Platform, Provider,
};
use trialflow_terraform::TerraformExecutor;

pub struct DeployArgs {
    pub environment: Environment,
    pub cloud: CloudSelector,
    pub action: Action,
    pub auto_approve: bool,
    pub skip_validation: bool,
    pub parallel: bool,
    pub timeout: Option<u64>,
}

pub async fn handle(
    project_root: &Path,
    platform: &Platform,
    args: DeployArgs,
) -> anyhow::Result<()> {
    println!(
        "{}",
        format!("デプロイを開始します: {} @ {}", args.action, args.environment)
            .blue()
            .bold()
    );

    let env_config = platform.environment(args.environment)?;
    let providers = utils::select_providers(env_config, args.environment, args.cloud)?;

    println!();
    println!("{}", format!("対象プロバイダー ({} 個):", providers.len()).bold());
    for provider in &providers {
        println!("  • {} ({})", provider.as_str().cyan(), provider.display_name());
    }

    let confirm = StdinConfirm;
    let mut auto_approve = args.auto_approve;

    // 保護環境でのdestroyは --auto-approve が指定されていても必ず対話確認する
    if args.action == Action::Destroy && env_config.protected {
        println!();
        println!(
            "{}",
            format!("警告: '{}' は保護環境です。", args.environment)
                .yellow()
                .bold()
        );
        let prompt = format!(
            "本当に {} 環境のインフラを破棄しますか？",
            args.environment
        );
        if !confirm.confirm(&prompt) {
            return abort_run(args.environment, providers, args.action);
        }
    }

    // 並列実行は開始後にプロンプトを出せないため、破壊的アクションは事前に一括確認
    if args.parallel && args.action.is_mutating() && !auto_approve {
        println!();
        let prompt = format!(
            "{} を {} 環境の {} プロバイダーに対して並列実行しますか？",
            args.action,
            args.environment,
            providers.len()
        );
        if !confirm.confirm(&prompt) {
            return abort_run(args.environment, providers, args.action);
        }
        auto_approve = true;
    }

    // 実行前チェック（CLIツールの存在と各プロバイダーの認証）
    if args.skip_validation {
        println!();
        println!(
            "{}",
            "実行前チェックをスキップ（--skip-validation指定）".yellow()
        );
    } else {
        println!();
        println!("{}", "実行前チェック中...".blue());
        preflight_check(&providers, &platform.required_tools).await?;
        println!("{}", "✓ 実行前チェック完了".green());
    }

    let mut request = DeploymentRequest::new(args.environment, providers, args.action)?
        .with_concurrent(args.parallel)
        .with_auto_approve(auto_approve);
    if let Some(secs) = args.timeout {
        request = request.with_timeout(Duration::from_secs(secs));
    }

    let executor = TerraformExecutor::new(project_root, platform.clone());
    let orchestrator = Orchestrator::new(executor);

    // Ctrl-Cで未完了のプロバイダーをキャンセルし、途中結果を集約する
    let result = orchestrator
        .run_until(&request, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    report::print_run(&request, &result);

    if !result.overall_succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// 事前確認で中止された場合: 全プロバイダーを中止扱いでレポートして終了コード1
fn abort_run(
    environment: Environment,
    providers: Vec<Provider>,
    action: Action,
) -> anyhow::Result<()> {
    let outcomes = providers
        .iter()
        .map(|p| ProviderOutcome::new(*p, OutcomeStatus::UserAborted, "confirmation declined"))
        .collect();
    let result = RunResult::aggregate(outcomes);
    let request = DeploymentRequest::new(environment, providers, action)?;

    report::print_run(&request, &result);
    std::process::exit(1);
}
