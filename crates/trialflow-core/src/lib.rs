//! TrialFlow Core — 臨床試験分析プラットフォームのマルチクラウドデプロイ基盤
//!
//! `trial.kdl` マニフェストのモデル・パーサー・発見ロジックと、
//! 1回の実行を表す不変の `DeploymentRequest` を提供します。
//!
//! # 概要
//!
//! - **model**: 環境・プロバイダー・アクションなどのドメイン型
//! - **parser**: trial.kdl → `Platform` のKDLパーサー
//! - **discovery**: プロジェクトルートの自動発見（環境変数 → 上方向探索）
//! - **request**: 実行リクエスト（グローバル変数の代わりに明示的に引き回す）

pub mod discovery;
pub mod error;
pub mod model;
pub mod parser;
pub mod request;

pub use discovery::*;
pub use error::*;
pub use model::*;
pub use parser::*;
pub use request::*;
