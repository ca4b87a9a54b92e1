use std::sync::Arc;

use pinhole_shortener::Shortener;
use pinhole_telemetry::LogSink;

/// Service name stamped on every audit event the gateway emits.
pub const SERVICE_NAME: &str = "backend";

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: Arc<str>,
    log_sink: Arc<dyn LogSink>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        public_base_url: impl Into<String>,
        log_sink: Arc<dyn LogSink>,
    ) -> Self {
        let base_url: String = public_base_url.into();
        Self {
            shortener,
            base_url: base_url.trim_end_matches('/').into(),
            log_sink,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Scheme, host and port that short links are built on.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn log_sink(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.log_sink)
    }
}
