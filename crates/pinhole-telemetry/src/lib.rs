//! Tracing setup and the audit-event relay shared by Pinhole services.
//!
//! Operational logging goes through `tracing` ([`init_tracing`]). Audit
//! events, the structured records the log collector keeps, are emitted via a
//! [`RequestLogger`] into a [`LogSink`], normally an [`HttpLogSink`] that
//! forwards them to the collector in the background.

pub mod error;
pub mod event;
pub mod relay;
pub mod request;
pub mod sink;
pub mod subscriber;

pub use error::{Result, TelemetryError};
pub use event::{LogEvent, LogLevel};
pub use relay::{HttpLogSink, HttpLogSinkSettings};
pub use request::{RequestContext, RequestLogger};
pub use sink::{emit_local, LocalSink, LogSink};
pub use subscriber::{init_tracing, LogFormat, TelemetryGuard, TracingConfig};

#[cfg(any(test, feature = "test-util"))]
pub use sink::RecordingSink;
