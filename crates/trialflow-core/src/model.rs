//! TrialFlow ドメインモデル
//!
//! trial.kdl マニフェストが定義するプラットフォーム構成と、
//! デプロイ対象を表す環境・プロバイダー・アクションの各型。

use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// デプロイ先クラウドプロバイダー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl Provider {
    /// 正準順序。逐次実行とレポート出力はこの順序に従う
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Azure, Provider::Gcp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
        }
    }

    /// UI表示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Aws => "Amazon Web Services",
            Provider::Azure => "Microsoft Azure",
            Provider::Gcp => "Google Cloud Platform",
        }
    }

    /// 各プロバイダーの認証確認に使うCLIツール名
    pub fn cli_tool(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "az",
            Provider::Gcp => "gcloud",
        }
    }
}

impl FromStr for Provider {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aws" => Ok(Provider::Aws),
            "azure" => Ok(Provider::Azure),
            "gcp" => Ok(Provider::Gcp),
            other => Err(FlowError::UnknownProvider(other.to_string())),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `-c/--cloud` のセレクタ（単一プロバイダーまたは all）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudSelector {
    One(Provider),
    All,
}

impl CloudSelector {
    /// セレクタを具体的なプロバイダー列に展開する（正準順序を維持）
    pub fn expand(&self) -> Vec<Provider> {
        match self {
            CloudSelector::One(p) => vec![*p],
            CloudSelector::All => Provider::ALL.to_vec(),
        }
    }
}

impl FromStr for CloudSelector {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CloudSelector::All)
        } else {
            Ok(CloudSelector::One(s.parse()?))
        }
    }
}

/// デプロイ環境（tier）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

impl FromStr for Environment {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" => Ok(Environment::Prod),
            other => Err(FlowError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// IaCバックエンドに対して実行するアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// 構成の構文・整合性チェックのみ（リモート状態を変更しない）
    Validate,
    /// 差分計算のみ（リモート状態を変更しない）
    Plan,
    /// インフラを変更する
    Apply,
    /// インフラを破棄する
    Destroy,
    /// 公開された出力値を読み取る
    Output,
}

impl Action {
    /// リモートインフラを変更しうるアクションか
    pub fn is_mutating(&self) -> bool {
        matches!(self, Action::Apply | Action::Destroy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Validate => "validate",
            Action::Plan => "plan",
            Action::Apply => "apply",
            Action::Destroy => "destroy",
            Action::Output => "output",
        }
    }
}

impl FromStr for Action {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validate" => Ok(Action::Validate),
            "plan" => Ok(Action::Plan),
            "apply" => Ok(Action::Apply),
            "destroy" => Ok(Action::Destroy),
            "output" => Ok(Action::Output),
            other => Err(FlowError::UnknownAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// trial.kdl が定義するプラットフォーム構成
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// プラットフォーム名（リポジトリ識別子）
    pub name: String,

    /// IaC構成のルートディレクトリ（プロジェクトルートからの相対パス）
    pub infra_root: PathBuf,

    /// 実行前チェックで必須とするCLIツール
    pub required_tools: Vec<String>,

    /// 環境定義のマップ
    pub environments: HashMap<Environment, EnvironmentConfig>,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            name: String::new(),
            infra_root: PathBuf::from("terraform"),
            required_tools: vec!["terraform".to_string()],
            environments: HashMap::new(),
        }
    }
}

impl Platform {
    /// 環境設定を取得する
    pub fn environment(&self, env: Environment) -> crate::error::Result<&EnvironmentConfig> {
        self.environments
            .get(&env)
            .ok_or_else(|| FlowError::EnvironmentNotFound(env.to_string()))
    }

    /// プロバイダーの構成ディレクトリを解決する
    ///
    /// レイアウト: `<root>/<infra_root>/environments/<env>/<provider>`
    pub fn config_dir(
        &self,
        project_root: &Path,
        env: Environment,
        provider: Provider,
    ) -> PathBuf {
        project_root
            .join(&self.infra_root)
            .join("environments")
            .join(env.as_str())
            .join(provider.as_str())
    }
}

/// 1つの環境（dev / staging / prod）の設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// この環境で有効なプロバイダー
    pub providers: Vec<Provider>,

    /// 保護環境か（destroyは --auto-approve でも対話確認を要求）
    pub protected: bool,

    /// プロバイダーごとのKubernetesクラスタ参照
    pub clusters: HashMap<Provider, ClusterRef>,
}

impl EnvironmentConfig {
    pub fn has_provider(&self, provider: Provider) -> bool {
        self.providers.contains(&provider)
    }
}

/// Kubernetesクラスタへの参照（kubectl コンテキスト）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRef {
    /// kubectl コンテキスト名
    pub context: String,

    /// 対象namespace（省略時は "default"）
    pub namespace: Option<String>,
}
