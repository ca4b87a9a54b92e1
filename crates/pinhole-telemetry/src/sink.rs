use crate::event::{LogEvent, LogLevel};
use std::sync::Arc;

/// Destination for audit events.
///
/// `dispatch` must not block or fail: delivery happens in the background and
/// any failure degrades to local output.
pub trait LogSink: Send + Sync + 'static {
    fn dispatch(&self, event: LogEvent);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn dispatch(&self, event: LogEvent) {
        (**self).dispatch(event)
    }
}

/// Writes an event's fallback line through `tracing` at the event's level.
pub fn emit_local(event: &LogEvent) {
    let line = event.fallback_line();
    match event.level {
        LogLevel::Info => tracing::info!(target: "pinhole::audit", "{}", line),
        LogLevel::Warn => tracing::warn!(target: "pinhole::audit", "{}", line),
        LogLevel::Error => tracing::error!(target: "pinhole::audit", "{}", line),
    }
}

/// A sink that only emits locally. Used when no collector is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSink;

impl LogSink for LocalSink {
    fn dispatch(&self, event: LogEvent) {
        emit_local(&event);
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use recording::RecordingSink;

#[cfg(any(test, feature = "test-util"))]
mod recording {
    use super::LogSink;
    use crate::event::LogEvent;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Keeps every dispatched event in memory for assertions.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink {
        events: Arc<Mutex<Vec<LogEvent>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<LogEvent> {
            self.events.lock().clone()
        }

        pub fn messages(&self) -> Vec<String> {
            self.events
                .lock()
                .iter()
                .map(|event| event.message.clone())
                .collect()
        }
    }

    impl LogSink for RecordingSink {
        fn dispatch(&self, event: LogEvent) {
            self.events.lock().push(event);
        }
    }
}
