//! Core reconciliation logic for repolite

pub mod config;
pub mod error;
pub mod options;
pub mod plan;
pub mod repo;
pub mod snapshot;
pub mod state;

pub use config::{Config, ConfigError, RepoEntry};
pub use error::ReconcileError;
pub use options::GlobalOptions;
pub use plan::{OperationPlan, PlanStep};
