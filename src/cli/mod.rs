//! CLI layer
//!
//! Mode handlers, output formatting and per-repo iteration used by the
//! `repolite` binary.

pub mod commands;
pub mod context;
pub mod output;
pub mod repo_iter;

pub use context::RepoContext;
pub use output::Output;
