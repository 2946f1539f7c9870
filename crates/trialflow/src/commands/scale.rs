use crate::utils;
use colored::Colorize;
use trialflow_cloud::{Confirm, StdinConfirm};
use trialflow_core::{CloudSelector, Environment, FlowError, Platform};
use trialflow_kube::Kubectl;

/// 対象クラスタのデプロイメントをスケールする
///
/// クラスタ状態を変更するため、applyと同じ確認規律に従う。
pub async fn handle(
    platform: &Platform,
    environment: Environment,
    cloud: CloudSelector,
    deployment: &str,
    replicas: u32,
    auto_approve: bool,
) -> anyhow::Result<()> {
    let env_config = platform.environment(environment)?;
    let providers = utils::select_providers(env_config, environment, cloud)?;

    println!(
        "{}",
        format!(
            "スケール変更: {} → {} レプリカ ({} 環境, {} プロバイダー)",
            deployment,
            replicas,
            environment,
            providers.len()
        )
        .blue()
        .bold()
    );

    if !auto_approve {
        let prompt = format!(
            "{} 環境の '{}' を {} レプリカに変更しますか？",
            environment, deployment, replicas
        );
        if !StdinConfirm.confirm(&prompt) {
            println!("{}", "中止しました".yellow());
            std::process::exit(1);
        }
    }

    let mut failed = false;
    for provider in providers {
        let Some(cluster) = env_config.clusters.get(&provider) else {
            // 明示指定されたプロバイダーにクラスタ定義が無いのはエラー
            if matches!(cloud, CloudSelector::One(_)) {
                return Err(FlowError::ClusterNotFound {
                    environment: environment.to_string(),
                    provider: provider.to_string(),
                }
                .into());
            }
            println!("  {} {} (クラスタ未定義)", "-".yellow(), provider);
            continue;
        };

        let kubectl = Kubectl::new(&cluster.context, cluster.namespace.clone());
        match kubectl.scale(deployment, replicas).await {
            Ok(()) => {
                println!(
                    "  {} {} をスケールしました",
                    "✓".green(),
                    provider.to_string().cyan()
                );
            }
            Err(e) => {
                println!("  {} {} スケールエラー: {}", "✗".red(), provider, e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
