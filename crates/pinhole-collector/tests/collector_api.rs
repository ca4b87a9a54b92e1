use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pinhole_collector::{App, LogStore};
use pinhole_telemetry::{
    HttpLogSink, HttpLogSinkSettings, LogLevel, LogSink, RequestContext, RequestLogger,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_log(router: &Router, event: Value) -> (StatusCode, Value) {
    let request = Request::post("/log")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .unwrap();
    call(router, request).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    call(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn wire_event(level: &str, category: &str, message: &str) -> Value {
    json!({
        "timestamp": "2024-01-01T00:00:00Z",
        "service": "backend",
        "level": level,
        "category": category,
        "message": message,
        "requestId": "req-1",
        "method": "GET",
        "url": "/abc12",
        "userAgent": null,
        "ip": "127.0.0.1"
    })
}

#[tokio::test]
async fn ingest_assigns_ids() {
    let store = LogStore::new();
    let router = App::router(store.clone());

    let (status, body) = post_log(&router, wire_event("info", "redirect", "one")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "logged", "id": 1 }));

    let (_, body) = post_log(&router, wire_event("warn", "redirect", "two")).await;
    assert_eq!(body["id"], 2);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn query_filters_and_limits() {
    let router = App::router(LogStore::new());
    post_log(&router, wire_event("info", "request", "a")).await;
    post_log(&router, wire_event("warn", "validation", "b")).await;
    post_log(&router, wire_event("info", "response", "c")).await;
    post_log(&router, wire_event("info", "request", "d")).await;

    let (status, body) = get(&router, "/logs?level=info&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    let messages: Vec<&str> = body["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|log| log["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["c", "d"]);

    let (_, body) = get(&router, "/logs?category=validation").await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["logs"][0]["id"], 2);
    assert_eq!(body["logs"][0]["requestId"], "req-1");
    assert!(body["logs"][0]["receivedAt"].is_string());

    let (_, body) = get(&router, "/logs?service=frontend").await;
    assert_eq!(body, json!({ "total": 0, "logs": [] }));
}

#[tokio::test]
async fn status_and_clear() {
    let router = App::router(LogStore::new());
    post_log(&router, wire_event("info", "request", "a")).await;
    post_log(&router, wire_event("info", "request", "b")).await;

    let (_, body) = get(&router, "/").await;
    assert_eq!(body["status"], "running");
    assert_eq!(body["totalLogs"], 2);
    assert!(body["endpoints"]["/logs/clear"].is_string());

    let request = Request::delete("/logs/clear").body(Body::empty()).unwrap();
    let (status, body) = call(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cleared 2 logs");

    let (_, body) = get(&router, "/").await;
    assert_eq!(body["totalLogs"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn relay_delivers_request_events_to_collector() {
    let store = LogStore::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = App::router(store.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let (sink, _worker) = HttpLogSink::spawn(
        HttpLogSinkSettings::builder()
            .collector_url(format!("http://{}", addr))
            .build(),
    )
    .unwrap();
    let logger = RequestLogger::new(
        Arc::new(sink) as Arc<dyn LogSink>,
        "backend",
        RequestContext {
            request_id: "req-9".to_string(),
            method: "GET".to_string(),
            url: "/abc12".to_string(),
            user_agent: Some("curl/8.0".to_string()),
            ip: Some("127.0.0.1".to_string()),
        },
    );

    logger.info("redirect", "Redirect request for shortcode: abc12");
    logger.warn("redirect", "Redirect failed: Short link not found - abc12");

    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(20))
        .until_async(|| async { store.len() == 2 })
        .await;

    let (total, logs) = store.query(&Default::default(), 0);
    assert_eq!(total, 2);
    assert_eq!(logs[0].id, 1);
    assert_eq!(logs[1].event.level, LogLevel::Warn);
    assert_eq!(logs[1].event.request_id.as_deref(), Some("req-9"));
    assert_eq!(logs[1].event.user_agent.as_deref(), Some("curl/8.0"));
}
