use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{HeaderValue, USER_AGENT};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use pinhole_telemetry::{RequestContext, RequestLogger};
use uuid::Uuid;

use crate::state::{AppState, SERVICE_NAME};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const UNKNOWN_IP: &str = "unknown";

/// Attaches a [`RequestLogger`] to the request and logs its start and completion.
pub async fn request_logging(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let context = request_context(&request);
    let method = context.method.clone();
    let url = context.url.clone();
    let request_id = context.request_id.clone();

    let logger = RequestLogger::new(state.log_sink(), SERVICE_NAME, context);
    logger.info("request", format!("{} {} - Started", method, url));
    request.extensions_mut().insert(logger.clone());

    let mut response = next.run(request).await;

    logger.info(
        "response",
        format!(
            "{} {} - {} - {}ms",
            method,
            url,
            response.status().as_u16(),
            started.elapsed().as_millis()
        ),
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn request_context(request: &Request) -> RequestContext {
    let headers = request.headers();

    let request_id = header_str(headers, REQUEST_ID_HEADER)
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .or_else(|| {
            header_str(headers, FORWARDED_FOR_HEADER)
                .and_then(|value| value.split(',').next())
                .map(|first| first.trim().to_owned())
                .filter(|first| !first.is_empty())
        })
        .unwrap_or_else(|| UNKNOWN_IP.to_owned());

    RequestContext {
        request_id,
        method: request.method().to_string(),
        url,
        user_agent: header_str(headers, USER_AGENT.as_str()).map(str::to_owned),
        ip: Some(ip),
    }
}

pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
