use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    analytics_handler, create_link_handler, redirect_handler, root_handler,
    shorturls_redirect_handler,
};
use crate::middleware::request_logging;
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the public router.
    ///
    /// `/{shortcode}` does not match `/shorturls`, so that path carries its
    /// own redirect for the code of the same name.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route(
                "/shorturls",
                post(create_link_handler).get(shorturls_redirect_handler),
            )
            .route("/shorturls/{shortcode}", get(analytics_handler))
            .route("/{shortcode}", get(redirect_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                request_logging,
            ))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}
