//! Per-provider outcomes and run-level aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trialflow_core::Provider;

/// Terminal status of one provider's execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The requested action completed
    Succeeded,
    /// The environment's configuration directory is absent
    ConfigNotFound,
    /// IaC syntax/semantic validation failed
    ValidationFailed,
    /// The action itself failed against the remote backend/cloud API
    ExecutionFailed,
    /// No response within the caller-imposed bound
    Timeout,
    /// Interactive confirmation declined; a deliberate no-op
    UserAborted,
    /// Interrupted mid-mutation; remote state may be partially applied
    PartialFailure,
}

impl OutcomeStatus {
    pub fn succeeded(&self) -> bool {
        matches!(self, OutcomeStatus::Succeeded)
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutcomeStatus::Succeeded => "succeeded",
            OutcomeStatus::ConfigNotFound => "config not found",
            OutcomeStatus::ValidationFailed => "validation failed",
            OutcomeStatus::ExecutionFailed => "execution failed",
            OutcomeStatus::Timeout => "timeout",
            OutcomeStatus::UserAborted => "aborted by user",
            OutcomeStatus::PartialFailure => "partial failure",
        };
        write!(f, "{}", s)
    }
}

/// Result of one provider's execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOutcome {
    /// The provider this outcome belongs to
    pub provider: Provider,

    /// Terminal status
    pub status: OutcomeStatus,

    /// Human-readable summary
    pub message: String,

    /// Execution time in milliseconds
    pub duration_ms: u64,
}

impl ProviderOutcome {
    pub fn new(provider: Provider, status: OutcomeStatus, message: impl Into<String>) -> Self {
        Self {
            provider,
            status,
            message: message.into(),
            duration_ms: 0,
        }
    }

    pub fn success(provider: Provider, message: impl Into<String>) -> Self {
        Self::new(provider, OutcomeStatus::Succeeded, message)
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn succeeded(&self) -> bool {
        self.status.succeeded()
    }
}

/// Aggregated result of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// True iff every outcome succeeded
    pub overall_succeeded: bool,

    /// One outcome per requested provider, in request order
    pub outcomes: Vec<ProviderOutcome>,

    /// When aggregation happened
    pub finished_at: DateTime<Utc>,
}

impl RunResult {
    /// Combine per-provider outcomes into one overall result
    ///
    /// Pure aggregation: outcome order is preserved as given.
    pub fn aggregate(outcomes: Vec<ProviderOutcome>) -> Self {
        let overall_succeeded = outcomes.iter().all(|o| o.succeeded());
        Self {
            overall_succeeded,
            outcomes,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_all_succeeded() {
        let result = RunResult::aggregate(vec![
            ProviderOutcome::success(Provider::Aws, "no changes"),
            ProviderOutcome::success(Provider::Gcp, "no changes"),
        ]);
        assert!(result.overall_succeeded);
        assert_eq!(result.outcomes.len(), 2);
    }

    #[test]
    fn test_aggregate_one_failure_flips_verdict() {
        let result = RunResult::aggregate(vec![
            ProviderOutcome::success(Provider::Aws, "applied"),
            ProviderOutcome::new(
                Provider::Azure,
                OutcomeStatus::ExecutionFailed,
                "backend unreachable",
            ),
            ProviderOutcome::success(Provider::Gcp, "applied"),
        ]);

        assert!(!result.overall_succeeded);
        // 他プロバイダーの成功は失敗に引きずられない
        assert!(result.outcomes[0].succeeded());
        assert!(!result.outcomes[1].succeeded());
        assert!(result.outcomes[2].succeeded());
    }

    #[test]
    fn test_aggregate_empty_is_success() {
        let result = RunResult::aggregate(vec![]);
        assert!(result.overall_succeeded);
    }

    #[test]
    fn test_user_aborted_is_not_success() {
        let result = RunResult::aggregate(vec![ProviderOutcome::new(
            Provider::Aws,
            OutcomeStatus::UserAborted,
            "confirmation declined",
        )]);
        assert!(!result.overall_succeeded);
    }

    #[test]
    fn test_aggregate_preserves_order() {
        let result = RunResult::aggregate(vec![
            ProviderOutcome::success(Provider::Gcp, ""),
            ProviderOutcome::success(Provider::Aws, ""),
        ]);
        assert_eq!(result.outcomes[0].provider, Provider::Gcp);
        assert_eq!(result.outcomes[1].provider, Provider::Aws);
    }
}
