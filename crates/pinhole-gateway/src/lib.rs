//! HTTP front door for the link registry.
//!
//! Exposes link creation, redirects and per-link analytics over JSON, and
//! emits a per-request audit trail through a [`pinhole_telemetry::LogSink`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::{AppState, SERVICE_NAME};
