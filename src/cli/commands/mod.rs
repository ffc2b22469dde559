//! CLI command implementations
//!
//! Each mode is implemented in its own module.

pub mod changelog;
pub mod config;
pub mod install;
pub mod lock;
pub mod show;
pub mod sync;
pub mod tag;
pub mod update;
