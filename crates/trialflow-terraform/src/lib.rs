//! Terraform backend integration for TrialFlow
//!
//! Wraps the `terraform` CLI the same way the cloud crates wrap their
//! provider CLIs, and provides the `ProviderExecutor` implementation that
//! runs one provider's requested action end-to-end against its configuration
//! directory. Remote state and locking are owned by the Terraform backend
//! and treated as opaque here.

pub mod error;
pub mod executor;
pub mod runner;

pub use error::{Result, TerraformError};
pub use executor::TerraformExecutor;
pub use runner::{PlanStatus, Terraform, ValidateDiagnostic, ValidateOutput};
