use crate::model::{ClearedResponse, LoggedResponse, LogsQuery, LogsResponse, StatusResponse};
use crate::store::{LogStore, DEFAULT_QUERY_LIMIT};
use axum::extract::{Query, State};
use axum::Json;
use pinhole_telemetry::LogEvent;
use std::collections::BTreeMap;
use tracing::info;

pub async fn ingest_handler(
    State(store): State<LogStore>,
    Json(event): Json<LogEvent>,
) -> Json<LoggedResponse> {
    let stored = store.append(event);
    let event = &stored.event;
    info!(
        target: "pinhole::collector",
        "[{}] {} - {} - {}: {}",
        event.timestamp,
        event.service.to_uppercase(),
        event.level.as_str().to_uppercase(),
        event.category,
        event.message
    );

    Json(LoggedResponse {
        status: "logged".to_string(),
        id: stored.id,
    })
}

pub async fn query_handler(
    State(store): State<LogStore>,
    Query(query): Query<LogsQuery>,
) -> Json<LogsResponse> {
    let (total, logs) = store.query(&query.filter(), query.limit.unwrap_or(DEFAULT_QUERY_LIMIT));
    Json(LogsResponse { total, logs })
}

pub async fn status_handler(State(store): State<LogStore>) -> Json<StatusResponse> {
    let endpoints = BTreeMap::from([
        ("/log".to_string(), "POST - Receive log entries".to_string()),
        (
            "/logs".to_string(),
            "GET - Retrieve logs (query: service, level, category, limit)".to_string(),
        ),
        ("/logs/clear".to_string(), "DELETE - Clear all logs".to_string()),
    ]);

    Json(StatusResponse {
        message: "Logging Service API".to_string(),
        status: "running".to_string(),
        total_logs: store.len(),
        endpoints,
    })
}

pub async fn clear_handler(State(store): State<LogStore>) -> Json<ClearedResponse> {
    let cleared = store.clear();
    info!(cleared, "cleared stored logs");
    Json(ClearedResponse {
        message: format!("Cleared {} logs", cleared),
    })
}
