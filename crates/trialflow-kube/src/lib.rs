//! Kubernetes cluster inspection for TrialFlow
//!
//! Thin kubectl wrapper used by the status/health/scale commands. Each
//! cluster is addressed by the kubeconfig context recorded in the platform
//! manifest, and all payloads are read as `-o json` and decoded into typed
//! structs.

pub mod error;
pub mod kubectl;

pub use error::{KubeError, Result};
pub use kubectl::{
    Deployment, DeploymentSpec, DeploymentStatus, Kubectl, Metadata, Node, NodeCondition,
    NodeReadiness, NodeStatus,
};
