//! TrialFlow Core エラー型

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("KDLパースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("ファイル読み込みエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("無効な設定: {0}")]
    InvalidConfig(String),

    #[error(
        "プロジェクトルートが見つかりません\n探索開始位置: {0}\nヒント: trial.kdl ファイルを含むディレクトリで実行してください"
    )]
    ProjectRootNotFound(PathBuf),

    #[error("環境が見つかりません: {0}")]
    EnvironmentNotFound(String),

    #[error("不明な環境: {0}（dev / staging / prod から選択してください）")]
    UnknownEnvironment(String),

    #[error("不明なクラウドプロバイダー: {0}（aws / azure / gcp / all から選択してください）")]
    UnknownProvider(String),

    #[error("不明なアクション: {0}（validate / plan / apply / destroy / output から選択してください）")]
    UnknownAction(String),

    #[error("プロバイダー '{provider}' は環境 '{environment}' で有効化されていません")]
    ProviderNotEnabled {
        environment: String,
        provider: String,
    },

    #[error("プロバイダーが1つも指定されていません")]
    EmptyProviders,

    #[error("環境 '{environment}' にプロバイダー '{provider}' のクラスタ定義がありません")]
    ClusterNotFound {
        environment: String,
        provider: String,
    },
}

pub type Result<T> = std::result::Result<T, FlowError>;
