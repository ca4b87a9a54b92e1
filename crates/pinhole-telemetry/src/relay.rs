use crate::error::{Result, TelemetryError};
use crate::event::LogEvent;
use crate::sink::{emit_local, LogSink};
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, TypedBuilder)]
pub struct HttpLogSinkSettings {
    /// Base URL of the collector; events are posted to `<base>/log`.
    #[builder(setter(into))]
    pub collector_url: String,
    /// Events buffered before new ones overflow to local output.
    #[builder(default = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
    #[builder(default = DEFAULT_DELIVERY_TIMEOUT)]
    pub timeout: Duration,
}

/// Relays events to a log collector over HTTP.
///
/// `dispatch` only enqueues; a background task posts events in order. When
/// the queue is full, the worker is gone, or a delivery fails, the event is
/// emitted locally instead.
#[derive(Debug, Clone)]
pub struct HttpLogSink {
    sender: mpsc::Sender<LogEvent>,
}

impl HttpLogSink {
    /// Starts the delivery worker on the current tokio runtime.
    ///
    /// The worker exits once every clone of the returned sink is dropped
    /// and the queue has drained.
    pub fn spawn(settings: HttpLogSinkSettings) -> Result<(Self, JoinHandle<()>)> {
        let endpoint = log_endpoint(&settings.collector_url)?;
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;

        let (sender, receiver) = mpsc::channel(settings.queue_capacity.max(1));
        let worker = tokio::spawn(run_worker(client, endpoint, receiver));

        Ok((Self { sender }, worker))
    }
}

impl LogSink for HttpLogSink {
    fn dispatch(&self, event: LogEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("log relay queue is full, emitting locally");
                emit_local(&event);
            }
            Err(TrySendError::Closed(event)) => emit_local(&event),
        }
    }
}

async fn run_worker(client: Client, endpoint: Url, mut receiver: mpsc::Receiver<LogEvent>) {
    while let Some(event) = receiver.recv().await {
        if let Err(e) = deliver(&client, &endpoint, &event).await {
            warn!(error = %e, "failed to send log to logging service");
            emit_local(&event);
        }
    }
    debug!("log relay worker stopped");
}

/// Posts a single event to `endpoint`.
pub async fn deliver(client: &Client, endpoint: &Url, event: &LogEvent) -> Result<()> {
    let response = client
        .post(endpoint.clone())
        .json(event)
        .send()
        .await
        .map_err(|e| TelemetryError::UpstreamUnavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TelemetryError::Rejected(status.as_u16()));
    }

    Ok(())
}

/// Resolves `<base>/log`, keeping any path prefix on the base URL.
pub fn log_endpoint(collector_url: &str) -> Result<Url> {
    let mut url = Url::parse(collector_url)
        .map_err(|e| TelemetryError::InvalidEndpoint(format!("{}: {}", collector_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| TelemetryError::InvalidEndpoint(collector_url.to_string()))?
        .pop_if_empty()
        .push("log");

    Ok(url)
}
