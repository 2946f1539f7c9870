use crate::utils;
use colored::Colorize;
use trialflow_core::{CloudSelector, Environment, Platform};
use trialflow_kube::Kubectl;

/// 各クラスタのデプロイメント状態（ready/desired）を表示
pub async fn handle(
    platform: &Platform,
    environment: Environment,
    cloud: CloudSelector,
) -> anyhow::Result<()> {
    let env_config = platform.environment(environment)?;
    let providers = utils::select_providers(env_config, environment, cloud)?;

    println!(
        "{}",
        format!("デプロイメント状態: {} 環境", environment)
            .blue()
            .bold()
    );

    let mut failed = false;
    for provider in providers {
        println!();
        println!(
            "{}",
            format!("■ {} ({})", provider, provider.display_name()).bold()
        );

        let Some(cluster) = env_config.clusters.get(&provider) else {
            println!("  {} クラスタ未定義", "-".yellow());
            continue;
        };

        let kubectl = Kubectl::new(&cluster.context, cluster.namespace.clone());
        match kubectl.deployments().await {
            Ok(deployments) if deployments.is_empty() => {
                println!("  デプロイメントなし");
            }
            Ok(deployments) => {
                for deployment in deployments {
                    let mark = if deployment.is_ready() {
                        "✓".green()
                    } else {
                        "✗".red()
                    };
                    println!(
                        "  {} {} {}/{}",
                        mark,
                        deployment.name().cyan(),
                        deployment.ready_replicas(),
                        deployment.desired_replicas()
                    );
                }
            }
            Err(e) => {
                println!("  {} 状態取得エラー: {}", "✗".red(), e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
