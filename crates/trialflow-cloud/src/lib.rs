//! TrialFlow Cloud Orchestration
//!
//! This crate provides the cloud provider abstraction and the fan-out/fan-in
//! deployment orchestrator for TrialFlow, coordinating one executor per cloud
//! provider and aggregating their outcomes into a single run result.
//!
//! # Supported Providers
//!
//! - **AWS**: identity via `aws sts get-caller-identity`
//! - **Azure**: identity via `az account show`
//! - **GCP**: identity via `gcloud auth list`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  TrialFlow CLI                   │
//! │                 (trial deploy)                   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               trialflow-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Preflight     trait CloudProvider        │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐    │
//! │  │ Orchestrator │  │  trait ProviderExecutor│    │
//! │  └──────────────┘  └──────────────────────┘    │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │ aws / azure / │ │  terraform    │
//! │ gcp CLIs      │ │  executor     │
//! └───────────────┘ └───────────────┘
//! ```

pub mod aws;
pub mod azure;
pub mod cli;
pub mod confirm;
pub mod error;
pub mod gcp;
pub mod orchestrator;
pub mod outcome;
pub mod preflight;
pub mod provider;

// Re-exports
pub use confirm::{AutoApprove, Confirm, Deny, StdinConfirm};
pub use error::{CloudError, Result};
pub use orchestrator::Orchestrator;
pub use outcome::{OutcomeStatus, ProviderOutcome, RunResult};
pub use preflight::{ensure_tool, preflight_check};
pub use provider::{AuthStatus, CloudProvider, ProviderExecutor, provider_cli};
