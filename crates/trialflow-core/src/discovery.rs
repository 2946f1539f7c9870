//! プロジェクトルート発見ロジック
//!
//! trial.kdl を自動的に発見する（環境変数 → 上方向探索）。

use crate::error::{FlowError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// マニフェストファイル名
pub const MANIFEST_FILENAME: &str = "trial.kdl";

/// プロジェクトルートの環境変数
const PROJECT_ROOT_ENV: &str = "TRIALFLOW_PROJECT_ROOT";

/// プロジェクトルートを検出
///
/// 以下の優先順位で検索:
/// 1. 環境変数 TRIALFLOW_PROJECT_ROOT
/// 2. カレントディレクトリから上に向かって trial.kdl を探す
#[tracing::instrument]
pub fn find_project_root() -> Result<PathBuf> {
    // 1. 環境変数
    if let Ok(root) = std::env::var(PROJECT_ROOT_ENV) {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking TRIALFLOW_PROJECT_ROOT");
        if path.join(MANIFEST_FILENAME).exists() {
            info!(project_root = %path.display(), "Found project root from environment variable");
            return Ok(path);
        }
        warn!(env_root = %root, "TRIALFLOW_PROJECT_ROOT is set but trial.kdl does not exist");
    }

    // 2. カレントディレクトリから上に向かって探す
    let start_dir = std::env::current_dir()?;
    find_project_root_from(&start_dir)
}

/// 指定ディレクトリから上方向に trial.kdl を探す
pub fn find_project_root_from(start_dir: &Path) -> Result<PathBuf> {
    let mut current = start_dir.to_path_buf();
    debug!(start_dir = %start_dir.display(), "Searching for {}", MANIFEST_FILENAME);

    loop {
        let manifest = current.join(MANIFEST_FILENAME);
        if manifest.exists() {
            info!(project_root = %current.display(), "Found project root");
            return Ok(current);
        }

        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project root not found");
    Err(FlowError::ProjectRootNotFound(start_dir.to_path_buf()))
}

/// プロジェクトルートからマニフェストのパスを取得
pub fn manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(MANIFEST_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_from_root_with_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join(MANIFEST_FILENAME), "platform \"test\"").unwrap();

        let found = find_project_root_from(root).unwrap();
        assert_eq!(found, root);
    }

    #[test]
    fn test_find_from_subdirectory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join(MANIFEST_FILENAME), "platform \"test\"").unwrap();

        let sub_dir = root.join("terraform").join("environments").join("dev");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let found = find_project_root_from(&sub_dir).unwrap();
        assert_eq!(found, root);
    }

    #[test]
    fn test_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = find_project_root_from(temp_dir.path()).unwrap_err();
        assert!(matches!(err, FlowError::ProjectRootNotFound(_)));
    }

    #[test]
    fn test_env_var_takes_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join(MANIFEST_FILENAME), "platform \"test\"").unwrap();

        temp_env::with_var(
            PROJECT_ROOT_ENV,
            Some(root.to_str().unwrap()),
            || {
                let found = find_project_root().unwrap();
                assert_eq!(found, root);
            },
        );
    }
}
