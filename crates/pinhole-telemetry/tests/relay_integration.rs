use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pinhole_telemetry::relay::{deliver, log_endpoint};
use pinhole_telemetry::{
    HttpLogSink, HttpLogSinkSettings, LogEvent, LogLevel, LogSink, TelemetryError,
};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

type Received = Arc<Mutex<Vec<LogEvent>>>;

/// Starts a minimal collector on an ephemeral port and returns its base URL.
async fn start_collector(status: StatusCode) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            "/log",
            post(
                move |State(received): State<Received>, Json(event): Json<LogEvent>| async move {
                    received.lock().unwrap().push(event);
                    status
                },
            ),
        )
        .with_state(Arc::clone(&received));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), received)
}

/// An address nothing is listening on.
async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn event(message: &str) -> LogEvent {
    LogEvent::new("backend", LogLevel::Info, "url-shortener", message)
}

fn events(count: usize) -> Vec<LogEvent> {
    (0..count).map(|i| event(&format!("event {}", i))).collect()
}

/// Everything the local subscriber writes while the guard is alive.
#[derive(Clone, Default)]
struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    /// Installs a thread-local subscriber writing into the returned buffer.
    ///
    /// Tests using this stay on the current-thread runtime so the relay
    /// worker logs through the same subscriber.
    fn install() -> (Self, DefaultGuard) {
        let captured = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    fn fallback_lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .filter_map(|line| line.find("[FALLBACK]").map(|at| line[at..].to_string()))
            .collect()
    }
}

impl io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedOutput {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sink_delivers_events_in_order() {
    let (base_url, received) = start_collector(StatusCode::OK).await;
    let (sink, _worker) =
        HttpLogSink::spawn(HttpLogSinkSettings::builder().collector_url(base_url).build())
            .unwrap();

    for i in 0..5 {
        sink.dispatch(event(&format!("event {}", i)));
    }

    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(20))
        .until_async(|| async { received.lock().unwrap().len() == 5 })
        .await;

    let messages: Vec<String> = received
        .lock()
        .unwrap()
        .iter()
        .map(|e| e.message.clone())
        .collect();
    assert_eq!(
        messages,
        vec!["event 0", "event 1", "event 2", "event 3", "event 4"]
    );
}

#[tokio::test]
async fn worker_stops_after_sink_dropped() {
    let (base_url, received) = start_collector(StatusCode::OK).await;
    let (sink, worker) =
        HttpLogSink::spawn(HttpLogSinkSettings::builder().collector_url(base_url).build())
            .unwrap();

    sink.dispatch(event("last words"));
    drop(sink);

    tokio::time::timeout(Duration::from_secs(5), worker)
        .await
        .expect("worker should drain and stop")
        .unwrap();
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_collector_falls_back_without_blocking() {
    let (output, _guard) = CapturedOutput::install();
    let (sink, worker) = HttpLogSink::spawn(
        HttpLogSinkSettings::builder()
            .collector_url(dead_endpoint().await)
            .timeout(Duration::from_millis(200))
            .build(),
    )
    .unwrap();
    let sent = events(100);

    let started = std::time::Instant::now();
    for event in &sent {
        sink.dispatch(event.clone());
    }
    assert!(started.elapsed() < Duration::from_millis(100));

    drop(sink);
    tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("failed deliveries should not wedge the worker")
        .unwrap();

    let expected: Vec<String> = sent.iter().map(LogEvent::fallback_line).collect();
    assert_eq!(output.fallback_lines(), expected);
}

#[tokio::test]
async fn full_queue_falls_back_locally() {
    let (output, _guard) = CapturedOutput::install();
    let (sink, worker) = HttpLogSink::spawn(
        HttpLogSinkSettings::builder()
            .collector_url(dead_endpoint().await)
            .queue_capacity(1)
            .build(),
    )
    .unwrap();
    let sent = events(10);

    // The worker has not been polled yet, so only the first event is queued.
    for event in &sent {
        sink.dispatch(event.clone());
    }
    let overflow: Vec<String> = sent[1..].iter().map(LogEvent::fallback_line).collect();
    assert_eq!(output.fallback_lines(), overflow);

    drop(sink);
    tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("worker should drain and stop")
        .unwrap();

    let lines = output.fallback_lines();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[9], sent[0].fallback_line());
}

#[tokio::test]
async fn rejected_delivery_falls_back_locally() {
    let (output, _guard) = CapturedOutput::install();
    let (base_url, received) = start_collector(StatusCode::SERVICE_UNAVAILABLE).await;
    let (sink, worker) =
        HttpLogSink::spawn(HttpLogSinkSettings::builder().collector_url(base_url).build())
            .unwrap();
    let sent = vec![
        event("accepted nowhere"),
        LogEvent::new("backend", LogLevel::Warn, "redirect", "Redirect failed"),
    ];

    for event in &sent {
        sink.dispatch(event.clone());
    }
    drop(sink);
    tokio::time::timeout(Duration::from_secs(10), worker)
        .await
        .expect("worker should drain and stop")
        .unwrap();

    assert_eq!(received.lock().unwrap().len(), 2);
    let expected: Vec<String> = sent.iter().map(LogEvent::fallback_line).collect();
    assert_eq!(output.fallback_lines(), expected);
}

#[tokio::test]
async fn deliver_reports_unreachable_collector() {
    let client = reqwest::Client::new();
    let endpoint = log_endpoint(&dead_endpoint().await).unwrap();

    let err = deliver(&client, &endpoint, &event("hello")).await.unwrap_err();
    assert!(matches!(err, TelemetryError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn deliver_reports_rejection_status() {
    let (base_url, _received) = start_collector(StatusCode::SERVICE_UNAVAILABLE).await;
    let client = reqwest::Client::new();
    let endpoint = log_endpoint(&base_url).unwrap();

    let err = deliver(&client, &endpoint, &event("hello")).await.unwrap_err();
    assert!(matches!(err, TelemetryError::Rejected(503)));
}
