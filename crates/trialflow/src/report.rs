//! 実行結果レポートの描画

use crate::utils;
use colored::Colorize;
use trialflow_cloud::{OutcomeStatus, RunResult};
use trialflow_core::DeploymentRequest;

/// 1プロバイダー1行 + 全体判定のレポートを出力
pub fn print_run(request: &DeploymentRequest, result: &RunResult) {
    println!();
    println!(
        "{}",
        format!(
            "実行結果: {} @ {} ({} プロバイダー)",
            request.action,
            request.environment,
            result.outcomes.len()
        )
        .bold()
    );

    for outcome in &result.outcomes {
        let mark = match outcome.status {
            OutcomeStatus::Succeeded => "✓".green(),
            OutcomeStatus::UserAborted => "-".yellow(),
            _ => "✗".red(),
        };
        let status = match outcome.status {
            OutcomeStatus::Succeeded => outcome.status.to_string().green(),
            OutcomeStatus::UserAborted => outcome.status.to_string().yellow(),
            _ => outcome.status.to_string().red(),
        };

        println!(
            "  {} {:<6} {} [{}] {}",
            mark,
            outcome.provider.as_str().cyan(),
            status,
            utils::format_duration(outcome.duration_ms),
            utils::first_line(&outcome.message)
        );
    }

    println!();
    if result.overall_succeeded {
        println!(
            "{}",
            "✓ すべてのプロバイダーで成功しました".green().bold()
        );
    } else {
        println!(
            "{}",
            "✗ 一部のプロバイダーで失敗しました".red().bold()
        );
    }
}
