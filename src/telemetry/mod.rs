//! Logging setup for repolite.
//!
//! Structured logging goes through the `tracing` crate; the subscriber is
//! installed once by the binary.

mod init;

pub use init::{init_telemetry, TelemetryConfig, TelemetryGuard};
