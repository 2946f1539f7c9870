//! trial.kdl パーサー
//!
//! マニフェストKDL構文をパースして `Platform` 構造体を生成する。

use crate::error::{FlowError, Result};
use crate::model::{ClusterRef, Environment, EnvironmentConfig, Platform, Provider};
use kdl::{KdlDocument, KdlNode};
use std::path::{Path, PathBuf};

/// KDLファイルを Platform にパース
pub fn parse_platform_file(path: &Path) -> Result<Platform> {
    let content = std::fs::read_to_string(path)?;
    parse_platform(&content)
}

/// KDL文字列を Platform にパース
pub fn parse_platform(content: &str) -> Result<Platform> {
    let doc: KdlDocument = content.parse()?;

    let mut platform = Platform::default();

    for node in doc.nodes() {
        match node.name().value() {
            "platform" => {
                if let Some(name) = node.entries().first().and_then(|e| e.value().as_string()) {
                    platform.name = name.to_string();
                }
            }
            "infra" => {
                parse_infra(node, &mut platform);
            }
            "environment" => {
                let (env, config) = parse_environment(node)?;
                if platform.environments.insert(env, config).is_some() {
                    return Err(FlowError::InvalidConfig(format!(
                        "環境 '{}' が重複定義されています",
                        env
                    )));
                }
            }
            _ => {
                // 不明なノードはスキップ
            }
        }
    }

    if platform.name.is_empty() {
        return Err(FlowError::InvalidConfig(
            "platform ノードが必要です".to_string(),
        ));
    }

    if platform.environments.is_empty() {
        return Err(FlowError::InvalidConfig(
            "environment ノードが1つ以上必要です".to_string(),
        ));
    }

    // バリデーション: クラスタ参照が有効なプロバイダーを指しているか
    for (env, config) in &platform.environments {
        for provider in config.clusters.keys() {
            if !config.has_provider(*provider) {
                return Err(FlowError::ProviderNotEnabled {
                    environment: env.to_string(),
                    provider: provider.to_string(),
                });
            }
        }
    }

    Ok(platform)
}

/// infra ノードをパース
fn parse_infra(node: &KdlNode, platform: &mut Platform) {
    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "root" => {
                    if let Some(root) = child.entries().first().and_then(|e| e.value().as_string())
                    {
                        platform.infra_root = PathBuf::from(root);
                    }
                }
                "tools" => {
                    let tools: Vec<String> = child
                        .entries()
                        .iter()
                        .filter_map(|e| e.value().as_string())
                        .map(|s| s.to_string())
                        .collect();
                    if !tools.is_empty() {
                        platform.required_tools = tools;
                    }
                }
                _ => {}
            }
        }
    }
}

/// environment ノードをパース
fn parse_environment(node: &KdlNode) -> Result<(Environment, EnvironmentConfig)> {
    let name = node
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| {
            FlowError::InvalidConfig("environment には名前が必要です".to_string())
        })?;

    let env: Environment = name.parse()?;
    let mut config = EnvironmentConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "providers" => {
                    for entry in child.entries() {
                        if let Some(s) = entry.value().as_string() {
                            let provider: Provider = s.parse()?;
                            if !config.providers.contains(&provider) {
                                config.providers.push(provider);
                            }
                        }
                    }
                }
                "protected" => {
                    config.protected = child
                        .entries()
                        .first()
                        .and_then(|e| e.value().as_bool())
                        .unwrap_or(true);
                }
                "cluster" => {
                    let (provider, cluster) = parse_cluster(child)?;
                    config.clusters.insert(provider, cluster);
                }
                _ => {}
            }
        }
    }

    if config.providers.is_empty() {
        return Err(FlowError::InvalidConfig(format!(
            "環境 '{}' に providers が定義されていません",
            env
        )));
    }

    Ok((env, config))
}

/// cluster ノードをパース
fn parse_cluster(node: &KdlNode) -> Result<(Provider, ClusterRef)> {
    let provider: Provider = node
        .entries()
        .first()
        .filter(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| {
            FlowError::InvalidConfig("cluster にはプロバイダー名が必要です".to_string())
        })?
        .parse()?;

    let mut context = None;
    let mut namespace = None;

    for entry in node.entries() {
        if let Some(name) = entry.name() {
            match name.value() {
                "context" => context = entry.value().as_string().map(|s| s.to_string()),
                "namespace" => namespace = entry.value().as_string().map(|s| s.to_string()),
                _ => {}
            }
        }
    }

    let context = context.ok_or_else(|| {
        FlowError::InvalidConfig("cluster に context が必要です".to_string())
    })?;

    Ok((provider, ClusterRef { context, namespace }))
}
