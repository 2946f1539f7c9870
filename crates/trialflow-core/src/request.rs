//! 実行リクエスト
//!
//! 1回の実行に必要な入力をすべて保持する不変の値。パース済み入力から
//! 一度だけ構築し、各コンポーネントへ明示的に渡す（暗黙のグローバル状態を持たない）。

use crate::error::{FlowError, Result};
use crate::model::{Action, Environment, Provider};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// デプロイ実行リクエスト
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// 対象環境
    pub environment: Environment,

    /// 対象プロバイダー（空でない・重複なし・入力順を維持）
    pub providers: Vec<Provider>,

    /// 実行するアクション
    pub action: Action,

    /// 並行実行するか（falseなら正準順序で逐次実行）
    pub concurrent: bool,

    /// apply/destroy の対話確認をスキップするか
    pub auto_approve: bool,

    /// プロバイダーごとの実行タイムアウト
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl DeploymentRequest {
    /// リクエストを構築する
    ///
    /// プロバイダー列は空であってはならない。重複は先勝ちで除去される。
    pub fn new(
        environment: Environment,
        providers: Vec<Provider>,
        action: Action,
    ) -> Result<Self> {
        if providers.is_empty() {
            return Err(FlowError::EmptyProviders);
        }

        let mut deduped = Vec::with_capacity(providers.len());
        for p in providers {
            if !deduped.contains(&p) {
                deduped.push(p);
            }
        }

        Ok(Self {
            environment,
            providers: deduped,
            action,
            concurrent: false,
            auto_approve: false,
            timeout: None,
        })
    }

    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// このリクエストが対話確認を要求するか
    pub fn needs_confirmation(&self) -> bool {
        self.action.is_mutating() && !self.auto_approve
    }
}
