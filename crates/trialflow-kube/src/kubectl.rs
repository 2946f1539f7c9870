//! kubectl CLI wrapper
//!
//! Wraps kubectl bound to one cluster context and namespace, decoding the
//! `-o json` payloads into typed structs. Cluster status is derived from the
//! decoded condition objects, never from grepping human-readable output, so
//! a node whose conditions are missing reports `Unknown` instead of being
//! misread as healthy.

use crate::error::{KubeError, Result};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

/// kubectl wrapper bound to one cluster context
pub struct Kubectl {
    context: String,
    namespace: Option<String>,
}

impl Kubectl {
    pub fn new(context: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            context: context.into(),
            namespace,
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Run kubectl with the bound context/namespace and return stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("kubectl");
        cmd.arg("--context").arg(&self.context);
        if let Some(ns) = &self.namespace {
            cmd.arg("--namespace").arg(ns);
        }
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(
            context = %self.context,
            "Running: kubectl {}",
            args.join(" ")
        );

        let output = cmd.output().await?;

        if !output.status.success() {
            return Err(KubeError::CommandFailed {
                command: args.first().unwrap_or(&"").to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// `kubectl get nodes -o json`
    pub async fn nodes(&self) -> Result<Vec<Node>> {
        let stdout = self.run(&["get", "nodes", "-o", "json"]).await?;
        let list: NodeList = serde_json::from_str(&stdout)?;
        Ok(list.items)
    }

    /// `kubectl get deployments -o json` （バインドされたnamespace内）
    pub async fn deployments(&self) -> Result<Vec<Deployment>> {
        let stdout = self.run(&["get", "deployments", "-o", "json"]).await?;
        let list: DeploymentList = serde_json::from_str(&stdout)?;
        Ok(list.items)
    }

    /// `kubectl scale deployment <name> --replicas=<n>`
    pub async fn scale(&self, deployment: &str, replicas: u32) -> Result<()> {
        let replicas_arg = format!("--replicas={}", replicas);
        self.run(&["scale", "deployment", deployment, &replicas_arg])
            .await?;
        Ok(())
    }
}

/// Node readiness as reported by the `Ready` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeReadiness {
    Ready,
    NotReady,
    /// The `Ready` condition is absent or has an unrecognized status
    Unknown,
}

impl std::fmt::Display for NodeReadiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeReadiness::Ready => write!(f, "Ready"),
            NodeReadiness::NotReady => write!(f, "NotReady"),
            NodeReadiness::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NodeList {
    #[serde(default)]
    items: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    pub metadata: Metadata,

    #[serde(default)]
    pub status: Option<NodeStatus>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Derive readiness from the `Ready` condition
    pub fn readiness(&self) -> NodeReadiness {
        let Some(status) = &self.status else {
            return NodeReadiness::Unknown;
        };
        match status
            .conditions
            .iter()
            .find(|c| c.kind == "Ready")
            .map(|c| c.status.as_str())
        {
            Some("True") => NodeReadiness::Ready,
            Some("False") => NodeReadiness::NotReady,
            _ => NodeReadiness::Unknown,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeStatus {
    #[serde(default)]
    pub conditions: Vec<NodeCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeCondition {
    #[serde(rename = "type")]
    pub kind: String,

    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DeploymentList {
    #[serde(default)]
    items: Vec<Deployment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub metadata: Metadata,

    #[serde(default)]
    pub spec: Option<DeploymentSpec>,

    #[serde(default)]
    pub status: Option<DeploymentStatus>,
}

impl Deployment {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn desired_replicas(&self) -> i64 {
        self.spec.as_ref().and_then(|s| s.replicas).unwrap_or(0)
    }

    pub fn ready_replicas(&self) -> i64 {
        self.status
            .as_ref()
            .and_then(|s| s.ready_replicas)
            .unwrap_or(0)
    }

    /// A deployment is ready when every desired replica reports ready
    pub fn is_ready(&self) -> bool {
        self.status.is_some() && self.ready_replicas() >= self.desired_replicas()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentSpec {
    #[serde(default)]
    pub replicas: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentStatus {
    #[serde(default)]
    pub replicas: Option<i64>,

    #[serde(rename = "readyReplicas", default)]
    pub ready_replicas: Option<i64>,

    #[serde(rename = "availableReplicas", default)]
    pub available_replicas: Option<i64>,
}
