use crate::utils;
use colored::Colorize;
use trialflow_core::{CloudSelector, Environment, Platform};
use trialflow_kube::{Kubectl, NodeReadiness};

/// 各クラスタのノード健全性を表示
pub async fn handle(
    platform: &Platform,
    environment: Environment,
    cloud: CloudSelector,
) -> anyhow::Result<()> {
    let env_config = platform.environment(environment)?;
    let providers = utils::select_providers(env_config, environment, cloud)?;

    println!(
        "{}",
        format!("クラスタ健全性: {} 環境", environment).blue().bold()
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
        match kubectl.nodes().await {
            Ok(nodes) => {
                let ready = nodes
                    .iter()
                    .filter(|n| n.readiness() == NodeReadiness::Ready)
                    .count();

                for node in &nodes {
                    let readiness = match node.readiness() {
                        NodeReadiness::Ready => "Ready".green(),
                        NodeReadiness::NotReady => "NotReady".red(),
                        // Readyコンディション欠落は健全と見なさない
                        NodeReadiness::Unknown => "Unknown".yellow(),
                    };
                    println!("  {} {}", node.name().cyan(), readiness);
                }

                if ready == nodes.len() {
                    println!("  {} {}/{} ノードがReady", "✓".green(), ready, nodes.len());
                } else {
                    println!("  {} {}/{} ノードがReady", "✗".red(), ready, nodes.len());
                }
            }
            Err(e) => {
                println!("  {} ノード取得エラー: {}", "✗".red(), e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
