//! repolite - local git dependency manager
//!
//! Keeps a set of git repositories under one top-level directory in sync
//! with a declarative YAML config, by driving the system `git` binary.

pub mod cli;
pub mod core;
pub mod git;
pub mod telemetry;
pub mod util;

pub use core::config::{Config, RepoEntry};
pub use core::error::ReconcileError;
pub use core::options::GlobalOptions;
