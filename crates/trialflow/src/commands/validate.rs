use colored::Colorize;
use std::path::Path;
use trialflow_core::{Platform, Provider};

/// マニフェスト (trial.kdl) の検証結果と構成の概要を表示
///
/// ここに到達した時点でパースと整合性チェックは通過している。
pub fn handle(project_root: &Path, platform: &Platform) {
    let manifest = trialflow_core::manifest_path(project_root);
    println!(
        "{} {}",
        "✓ マニフェストは有効です:".green().bold(),
        manifest.display().to_string().cyan()
    );

    println!();
    println!("プラットフォーム: {}", platform.name.cyan());
    println!("IaCルート: {}", platform.infra_root.display());
    println!("必須ツール: {}", platform.required_tools.join(", "));

    println!();
    println!("{}", format!("環境 ({} 個):", platform.environments.len()).bold());
    // HashMapの順序に依存せず、環境は固定順で表示する
    for env in [
        trialflow_core::Environment::Dev,
        trialflow_core::Environment::Staging,
        trialflow_core::Environment::Prod,
    ] {
        let Some(config) = platform.environments.get(&env) else {
            continue;
        };

        let protected = if config.protected {
            " (保護環境)".yellow().to_string()
        } else {
            String::new()
        };
        println!("  ■ {}{}", env.to_string().cyan(), protected);

        for provider in Provider::ALL {
            if !config.has_provider(provider) {
                continue;
            }
            match config.clusters.get(&provider) {
                Some(cluster) => {
                    println!(
                        "    • {} → クラスタ {}",
                        provider,
                        cluster.context.cyan()
                    );
                }
                None => {
                    println!("    • {}", provider);
                }
            }
        }
    }
}
