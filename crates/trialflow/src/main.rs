mod commands;
mod report;
mod utils;

use clap::{Parser, Subcommand};
use trialflow_core::{Action, CloudSelector, Environment};

#[derive(Parser)]
#[command(name = "trial")]
#[command(about = "臨床試験MLOps基盤のマルチクラウドデプロイオーケストレーター", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Terraformアクションを1つ以上のクラウドに対して実行
    Deploy {
        /// 環境 (dev, staging, prod)
        #[arg(short, long, env = "TRIAL_ENVIRONMENT")]
        environment: Environment,
        /// クラウドプロバイダー (aws, azure, gcp, all)
        #[arg(short, long, default_value = "all")]
        cloud: CloudSelector,
        /// アクション (validate, plan, apply, destroy, output)
        #[arg(short, long, default_value = "plan")]
        action: Action,
        /// 破壊的アクションの確認プロンプトをスキップ
        #[arg(long)]
        auto_approve: bool,
        /// 実行前チェック（CLIツール・認証）をスキップ
        #[arg(long)]
        skip_validation: bool,
        /// プロバイダーごとに並列実行する（デフォルトは正準順序で逐次）
        #[arg(short, long)]
        parallel: bool,
        /// プロバイダーごとのタイムアウト（秒）
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// 各クラスタのデプロイメント状態を表示
    Status {
        /// 環境 (dev, staging, prod)
        #[arg(short, long, env = "TRIAL_ENVIRONMENT")]
        environment: Environment,
        /// クラウドプロバイダー (aws, azure, gcp, all)
        #[arg(short, long, default_value = "all")]
        cloud: CloudSelector,
    },
    /// 各クラスタのノード健全性を表示
    Health {
        /// 環境 (dev, staging, prod)
        #[arg(short, long, env = "TRIAL_ENVIRONMENT")]
        environment: Environment,
        /// クラウドプロバイダー (aws, azure, gcp, all)
        #[arg(short, long, default_value = "all")]
        cloud: CloudSelector,
    },
    /// デプロイメントのレプリカ数を変更
    Scale {
        /// 対象デプロイメント名
        #[arg(short = 'n', long)]
        deployment: String,
        /// レプリカ数
        #[arg(short, long)]
        replicas: u32,
        /// 環境 (dev, staging, prod)
        #[arg(short, long, env = "TRIAL_ENVIRONMENT")]
        environment: Environment,
        /// クラウドプロバイダー (aws, azure, gcp, all)
        #[arg(short, long, default_value = "all")]
        cloud: CloudSelector,
        /// 確認プロンプトをスキップ
        #[arg(long)]
        auto_approve: bool,
    },
    /// マニフェスト (trial.kdl) を検証
    Validate,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    // Versionコマンドはマニフェスト不要
    if matches!(cli.command, Commands::Version) {
        println!("trialflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // プロジェクトルートを検索してマニフェストをロード
    let project_root = trialflow_core::find_project_root()?;
    let platform =
        trialflow_core::parse_platform_file(&trialflow_core::manifest_path(&project_root))?;

    match cli.command {
        Commands::Deploy {
            environment,
            cloud,
            action,
            auto_approve,
            skip_validation,
            parallel,
            timeout,
        } => {
            commands::deploy::handle(
                &project_root,
                &platform,
                commands::deploy::DeployArgs {
                    environment,
                    cloud,
                    action,
                    auto_approve,
                    skip_validation,
                    parallel,
                    timeout,
                },
            )
            .await?;
        }
        Commands::Status { environment, cloud } => {
            commands::status::handle(&platform, environment, cloud).await?;
        }
        Commands::Health { environment, cloud } => {
            commands::health::handle(&platform, environment, cloud).await?;
        }
        Commands::Scale {
            deployment,
            replicas,
            environment,
            cloud,
            auto_approve,
        } => {
            commands::scale::handle(
                &platform,
                environment,
                cloud,
                &deployment,
                replicas,
                auto_approve,
            )
            .await?;
        }
        Commands::Validate => {
            commands::validate::handle(&project_root, &platform);
        }
        Commands::Version => {
            unreachable!("Version is handled before manifest loading");
        }
    }

    Ok(())
}
