use crate::event::{LogEvent, LogLevel};
use crate::sink::LogSink;
use std::sync::Arc;

/// Request metadata attached to every event a [`RequestLogger`] emits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub method: String,
    pub url: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// Request-scoped handle for emitting audit events.
///
/// Cheap to clone; every clone shares the same sink and context.
#[derive(Clone)]
pub struct RequestLogger {
    sink: Arc<dyn LogSink>,
    service: Arc<str>,
    context: Arc<RequestContext>,
}

impl std::fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLogger")
            .field("service", &self.service)
            .field("context", &self.context)
            .finish()
    }
}

impl RequestLogger {
    pub fn new(sink: Arc<dyn LogSink>, service: impl Into<Arc<str>>, context: RequestContext) -> Self {
        Self {
            sink,
            service: service.into(),
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn request_id(&self) -> &str {
        &self.context.request_id
    }

    pub fn log(&self, level: LogLevel, category: &str, message: impl Into<String>) {
        let mut event = LogEvent::new(self.service.as_ref(), level, category, message);
        event.request_id = Some(self.context.request_id.clone());
        event.method = Some(self.context.method.clone());
        event.url = Some(self.context.url.clone());
        event.user_agent = self.context.user_agent.clone();
        event.ip = self.context.ip.clone();

        self.sink.dispatch(event);
    }

    pub fn info(&self, category: &str, message: impl Into<String>) {
        self.log(LogLevel::Info, category, message)
    }

    pub fn warn(&self, category: &str, message: impl Into<String>) {
        self.log(LogLevel::Warn, category, message)
    }

    pub fn error(&self, category: &str, message: impl Into<String>) {
        self.log(LogLevel::Error, category, message)
    }
}
