use trialflow_core::{CloudSelector, Environment, EnvironmentConfig, FlowError, Provider};

/// セレクタを環境で有効なプロバイダー列に解決する（共通ロジック）
///
/// `all` は環境で有効なプロバイダーに絞り込む。明示指定されたプロバイダーが
/// 環境で無効な場合はエラー。
pub fn select_providers(
    env_config: &EnvironmentConfig,
    environment: Environment,
    cloud: CloudSelector,
) -> anyhow::Result<Vec<Provider>> {
    match cloud {
        CloudSelector::One(provider) => {
            if !env_config.has_provider(provider) {
                return Err(FlowError::ProviderNotEnabled {
                    environment: environment.to_string(),
                    provider: provider.to_string(),
                }
                .into());
            }
            Ok(vec![provider])
        }
        CloudSelector::All => Ok(Provider::ALL
            .into_iter()
            .filter(|p| env_config.has_provider(*p))
            .collect()),
    }
}

/// 実行時間を人間向けに整形
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms < 1_000 {
        format!("{}ms", duration_ms)
    } else {
        format!("{:.1}s", duration_ms as f64 / 1_000.0)
    }
}

/// メッセージの先頭行のみを取り出す（レポートの1行表示用）
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}
