use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{clear_handler, ingest_handler, query_handler, status_handler};
use crate::store::LogStore;

pub struct App {}

impl App {
    pub fn router(store: LogStore) -> Router {
        Router::new()
            .route("/", get(status_handler))
            .route("/log", post(ingest_handler))
            .route("/logs", get(query_handler))
            .route("/logs/clear", delete(clear_handler))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(store)
    }
}
