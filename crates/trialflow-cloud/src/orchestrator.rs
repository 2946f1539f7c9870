//! Fan-out/fan-in deployment orchestrator
//!
//! Expands a provider selection into per-provider executions, either
//! sequentially in canonical order or as one tokio task per provider, and
//! aggregates outcomes into a single `RunResult`.
//!
//! Isolation is structural: each provider targets a disjoint configuration
//! directory and disjoint remote state, so executors share no mutable state
//! and no locking happens here. Failures never abort sibling providers, in
//! either mode; the report always covers every requested provider, in
//! request order regardless of completion order.

use crate::outcome::{OutcomeStatus, ProviderOutcome, RunResult};
use crate::provider::ProviderExecutor;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use trialflow_core::{DeploymentRequest, Provider};

/// Dispatches one executor per requested provider
pub struct Orchestrator<E> {
    executor: Arc<E>,
}

impl<E: ProviderExecutor + 'static> Orchestrator<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Run the request to completion
    pub async fn run(&self, request: &DeploymentRequest) -> RunResult {
        self.run_until(request, std::future::pending()).await
    }

    /// Run the request, cancelling outstanding executors when `cancel`
    /// resolves
    ///
    /// A cancelled mutating action is reported as `PartialFailure` because
    /// the remote backend may have been left partially applied; cancelled
    /// read-only actions fail plainly.
    pub async fn run_until(
        &self,
        request: &DeploymentRequest,
        cancel: impl Future<Output = ()> + Send,
    ) -> RunResult {
        let outcomes = if request.concurrent {
            self.run_concurrent(request, cancel).await
        } else {
            self.run_sequential(request, cancel).await
        };
        RunResult::aggregate(outcomes)
    }

    /// Sequential dispatch in request order; never fail-fast
    async fn run_sequential(
        &self,
        request: &DeploymentRequest,
        cancel: impl Future<Output = ()> + Send,
    ) -> Vec<ProviderOutcome> {
        tokio::pin!(cancel);

        let mut outcomes = Vec::with_capacity(request.providers.len());
        let mut cancelled = false;

        for provider in &request.providers {
            if cancelled {
                outcomes.push(cancelled_outcome(*provider, request, false));
                continue;
            }

            tokio::select! {
                outcome = execute_one(Arc::clone(&self.executor), *provider, request) => {
                    outcomes.push(outcome);
                }
                _ = &mut cancel => {
                    tracing::warn!(provider = provider.as_str(), "Cancellation requested");
                    cancelled = true;
                    outcomes.push(cancelled_outcome(*provider, request, true));
                }
            }
        }

        outcomes
    }

    /// Concurrent dispatch: one task per provider, joined as a group
    ///
    /// Results are slotted back by input index so the final sequence always
    /// matches the request order.
    async fn run_concurrent(
        &self,
        request: &DeploymentRequest,
        cancel: impl Future<Output = ()> + Send,
    ) -> Vec<ProviderOutcome> {
        let mut set = JoinSet::new();

        for (index, provider) in request.providers.iter().enumerate() {
            let executor = Arc::clone(&self.executor);
            let request = request.clone();
            let provider = *provider;
            set.spawn(async move { (index, execute_one(executor, provider, &request).await) });
        }

        let mut slots: Vec<Option<ProviderOutcome>> = vec![None; request.providers.len()];

        tokio::pin!(cancel);
        let mut cancelled = false;

        loop {
            tokio::select! {
                joined = set.join_next() => match joined {
                    Some(Ok((index, outcome))) => slots[index] = Some(outcome),
                    Some(Err(e)) => {
                        // abortされたタスク。結果は下で補完する
                        tracing::debug!("Executor task did not complete: {}", e);
                    }
                    None => break,
                },
                _ = &mut cancel, if !cancelled => {
                    tracing::warn!("Cancellation requested, aborting outstanding executors");
                    cancelled = true;
                    set.abort_all();
                }
            }
        }

        request
            .providers
            .iter()
            .zip(slots)
            .map(|(provider, slot)| {
                slot.unwrap_or_else(|| cancelled_outcome(*provider, request, true))
            })
            .collect()
    }
}

/// Execute one provider, bounding it by the request's timeout
async fn execute_one<E: ProviderExecutor>(
    executor: Arc<E>,
    provider: Provider,
    request: &DeploymentRequest,
) -> ProviderOutcome {
    let started = Instant::now();

    let outcome = match request.timeout {
        Some(limit) => {
            match tokio::time::timeout(limit, executor.execute(provider, request)).await {
                Ok(outcome) => outcome,
                Err(_) => ProviderOutcome::new(
                    provider,
                    OutcomeStatus::Timeout,
                    format!("no response within {}s", limit.as_secs()),
                ),
            }
        }
        None => executor.execute(provider, request).await,
    };

    outcome.with_duration(started.elapsed().as_millis() as u64)
}

fn cancelled_outcome(
    provider: Provider,
    request: &DeploymentRequest,
    was_running: bool,
) -> ProviderOutcome {
    if was_running && request.action.is_mutating() {
        ProviderOutcome::new(
            provider,
            OutcomeStatus::PartialFailure,
            format!(
                "cancelled during {}; remote state may be partially applied, operator follow-up required",
                request.action
            ),
        )
    } else if was_running {
        ProviderOutcome::new(
            provider,
            OutcomeStatus::ExecutionFailed,
            "cancelled before completion",
        )
    } else {
        ProviderOutcome::new(
            provider,
            OutcomeStatus::ExecutionFailed,
            "cancelled before start",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use trialflow_core::{Action, Environment};

    /// 遅延と結果をプロバイダーごとに差し込めるテスト用エグゼキュータ
    struct FakeExecutor {
        delays: HashMap<Provider, Duration>,
        failures: HashMap<Provider, OutcomeStatus>,
        invocations: AtomicUsize,
    }

    impl FakeExecutor {
        fn new() -> Self {
            Self {
                delays: HashMap::new(),
                failures: HashMap::new(),
                invocations: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, provider: Provider, delay: Duration) -> Self {
            self.delays.insert(provider, delay);
            self
        }

        fn with_failure(mut self, provider: Provider, status: OutcomeStatus) -> Self {
            self.failures.insert(provider, status);
            self
        }
    }

    #[async_trait]
    impl ProviderExecutor for FakeExecutor {
        async fn execute(
            &self,
            provider: Provider,
            _request: &DeploymentRequest,
        ) -> ProviderOutcome {
            self.invocations.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delays.get(&provider) {
                tokio::time::sleep(*delay).await;
            }

            match self.failures.get(&provider) {
                Some(status) => ProviderOutcome::new(provider, *status, "injected failure"),
                None => ProviderOutcome::success(provider, "ok"),
            }
        }
    }

    fn all_providers_request(action: Action) -> DeploymentRequest {
        DeploymentRequest::new(Environment::Dev, Provider::ALL.to_vec(), action).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_bounded_by_slowest_executor() {
        let executor = FakeExecutor::new()
            .with_delay(Provider::Aws, Duration::from_millis(100))
            .with_delay(Provider::Azure, Duration::from_millis(100))
            .with_delay(Provider::Gcp, Duration::from_millis(100));
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Plan).with_concurrent(true);

        let started = tokio::time::Instant::now();
        let result = orchestrator.run(&request).await;
        let elapsed = started.elapsed();

        assert!(result.overall_succeeded);
        // 3プロバイダーの合計(300ms)ではなく最遅の1つ(100ms)で抑えられる
        assert!(elapsed < Duration::from_millis(150), "elapsed: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_runs_one_at_a_time() {
        let executor = FakeExecutor::new()
            .with_delay(Provider::Aws, Duration::from_millis(100))
            .with_delay(Provider::Azure, Duration::from_millis(100))
            .with_delay(Provider::Gcp, Duration::from_millis(100));
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Plan);

        let started = tokio::time::Instant::now();
        let result = orchestrator.run(&request).await;
        let elapsed = started.elapsed();

        assert!(result.overall_succeeded);
        assert!(elapsed >= Duration::from_millis(300), "elapsed: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_order_matches_request_order() {
        // 完了順は gcp → azure → aws になるよう遅延を仕込む
        let executor = FakeExecutor::new()
            .with_delay(Provider::Aws, Duration::from_millis(300))
            .with_delay(Provider::Azure, Duration::from_millis(100))
            .with_delay(Provider::Gcp, Duration::from_millis(10));
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Plan).with_concurrent(true);
        let result = orchestrator.run(&request).await;

        let reported: Vec<Provider> = result.outcomes.iter().map(|o| o.provider).collect();
        assert_eq!(reported, Provider::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_outcome_set_equals_request_set() {
        let orchestrator = Orchestrator::new(FakeExecutor::new());
        let request = DeploymentRequest::new(
            Environment::Staging,
            vec![Provider::Gcp, Provider::Aws],
            Action::Validate,
        )
        .unwrap();

        let result = orchestrator.run(&request).await;
        let reported: Vec<Provider> = result.outcomes.iter().map(|o| o.provider).collect();
        assert_eq!(reported, vec![Provider::Gcp, Provider::Aws]);
    }

    #[tokio::test]
    async fn test_failure_isolation() {
        let executor =
            FakeExecutor::new().with_failure(Provider::Azure, OutcomeStatus::ExecutionFailed);
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Plan).with_concurrent(true);
        let result = orchestrator.run(&request).await;

        assert!(!result.overall_succeeded);
        assert!(result.outcomes[0].succeeded());
        assert_eq!(result.outcomes[1].status, OutcomeStatus::ExecutionFailed);
        assert!(result.outcomes[2].succeeded());
    }

    #[tokio::test]
    async fn test_sequential_never_fails_fast() {
        let executor =
            FakeExecutor::new().with_failure(Provider::Aws, OutcomeStatus::ValidationFailed);
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Validate);
        let result = orchestrator.run(&request).await;

        // 先頭が失敗しても残り全プロバイダーが実行される
        assert_eq!(
            orchestrator.executor.invocations.load(Ordering::SeqCst),
            3
        );
        assert!(!result.overall_succeeded);
        assert!(result.outcomes[1].succeeded());
        assert!(result.outcomes[2].succeeded());
    }

    #[tokio::test]
    async fn test_validate_is_deterministic_on_unchanged_config() {
        let executor = FakeExecutor::new()
            .with_failure(Provider::Azure, OutcomeStatus::ValidationFailed);
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Validate);

        // 構成が変わらない限り、同じリクエストは同じ結果を返す
        let first = orchestrator.run(&request).await;
        let second = orchestrator.run(&request).await;

        let statuses = |result: &RunResult| -> Vec<(Provider, OutcomeStatus)> {
            result
                .outcomes
                .iter()
                .map(|o| (o.provider, o.status))
                .collect()
        };
        assert_eq!(statuses(&first), statuses(&second));
        assert_eq!(first.overall_succeeded, second.overall_succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_produces_timeout_outcome() {
        let executor = FakeExecutor::new().with_delay(Provider::Aws, Duration::from_secs(600));
        let orchestrator = Orchestrator::new(executor);

        let request = DeploymentRequest::new(Environment::Dev, vec![Provider::Aws], Action::Plan)
            .unwrap()
            .with_timeout(Duration::from_secs(5));

        let result = orchestrator.run(&request).await;
        assert_eq!(result.outcomes[0].status, OutcomeStatus::Timeout);
        assert!(!result.overall_succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_isolated_per_provider() {
        let executor = FakeExecutor::new().with_delay(Provider::Azure, Duration::from_secs(600));
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Plan)
            .with_concurrent(true)
            .with_timeout(Duration::from_secs(5));

        let result = orchestrator.run(&request).await;
        assert!(result.outcomes[0].succeeded());
        assert_eq!(result.outcomes[1].status, OutcomeStatus::Timeout);
        assert!(result.outcomes[2].succeeded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_apply_reports_partial_failure() {
        let executor = FakeExecutor::new()
            .with_delay(Provider::Aws, Duration::from_secs(600))
            .with_delay(Provider::Azure, Duration::from_secs(600))
            .with_delay(Provider::Gcp, Duration::from_secs(600));
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Apply)
            .with_auto_approve(true)
            .with_concurrent(true);

        let cancel = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
        };

        let result = orchestrator.run_until(&request, cancel).await;
        assert!(!result.overall_succeeded);
        for outcome in &result.outcomes {
            assert_eq!(outcome.status, OutcomeStatus::PartialFailure);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_plan_is_plain_failure() {
        let executor = FakeExecutor::new().with_delay(Provider::Aws, Duration::from_secs(600));
        let orchestrator = Orchestrator::new(executor);

        let request = DeploymentRequest::new(Environment::Dev, vec![Provider::Aws], Action::Plan)
            .unwrap()
            .with_concurrent(true);

        let cancel = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
        };

        let result = orchestrator.run_until(&request, cancel).await;
        assert_eq!(result.outcomes[0].status, OutcomeStatus::ExecutionFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_sequential_skips_remaining() {
        let executor = FakeExecutor::new()
            .with_delay(Provider::Aws, Duration::from_secs(600))
            .with_delay(Provider::Azure, Duration::from_secs(600));
        let orchestrator = Orchestrator::new(executor);

        let request = all_providers_request(Action::Destroy).with_auto_approve(true);

        let cancel = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
        };

        let result = orchestrator.run_until(&request, cancel).await;
        // 実行中だったawsはPartialFailure、未着手の残りは通常の失敗
        assert_eq!(result.outcomes[0].status, OutcomeStatus::PartialFailure);
        assert_eq!(result.outcomes[1].status, OutcomeStatus::ExecutionFailed);
        assert_eq!(result.outcomes[2].status, OutcomeStatus::ExecutionFailed);
        assert_eq!(
            orchestrator.executor.invocations.load(Ordering::SeqCst),
            1
        );
    }
}
