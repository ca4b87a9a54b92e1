//! Log-collection service for Pinhole audit events.
//!
//! Receives [`pinhole_telemetry::LogEvent`]s over HTTP, keeps them in an
//! in-memory [`LogStore`] and serves them back with simple filtering.

pub mod app;
pub mod handlers;
pub mod model;
pub mod store;

pub use app::App;
pub use store::{LogFilter, LogStore, StoredLog};

/// Service name used for the collector's own tracing output.
pub const SERVICE_NAME: &str = "log-collector";
