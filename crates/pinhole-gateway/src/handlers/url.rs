use crate::error::{AppError, Result};
use crate::middleware::header_str;
use crate::model::{AnalyticsResponse, CreateLinkRequest, CreateLinkResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::{LOCATION, REFERER, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use pinhole_core::{ShortCode, Visit};
use pinhole_shortener::{ShortenParams, ShortenerError};
use pinhole_telemetry::RequestLogger;

pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(logger): Extension<RequestLogger>,
    payload: std::result::Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateLinkResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        let reason = rejection.body_text();
        logger.warn(
            "validation",
            format!("URL shortening failed: Malformed request body - {}", reason),
        );
        AppError::BadRequest(reason)
    })?;

    let url = request.url.unwrap_or_default();
    // An empty shortcode means "generate one".
    let custom_alias = request.shortcode.and_then(|code| ShortCode::new(code).ok());

    logger.info(
        "url-shortener",
        format!(
            "URL shortening request: {}, custom shortcode: {}",
            url,
            custom_alias.as_ref().map_or("none", ShortCode::as_str)
        ),
    );

    let params = ShortenParams {
        original_url: url.clone(),
        custom_alias,
        validity_minutes: request.validity,
    };

    match state.shortener().shorten(params).await {
        Ok(link) => {
            let short_link = link.shortcode.to_url(state.base_url());
            logger.info(
                "url-shortener",
                format!(
                    "URL shortened successfully: {} -> {}, expires: {}",
                    url, short_link, link.expire_at
                ),
            );
            Ok((
                StatusCode::CREATED,
                Json(CreateLinkResponse {
                    short_link,
                    expiry: link.expire_at,
                }),
            ))
        }
        Err(e) => {
            match &e {
                ShortenerError::MissingUrl => {
                    logger.warn("validation", "URL shortening failed: URL is required")
                }
                ShortenerError::InvalidUrl(_) => logger.warn(
                    "validation",
                    format!("URL shortening failed: Invalid URL format - {}", url),
                ),
                ShortenerError::InvalidValidity(reason) => logger.warn(
                    "validation",
                    format!("URL shortening failed: Invalid validity - {}", reason),
                ),
                ShortenerError::AliasConflict(code) => logger.warn(
                    "conflict",
                    format!("URL shortening failed: Shortcode already in use - {}", code),
                ),
                other => logger.error(
                    "url-shortener",
                    format!("URL shortening failed: {}", other),
                ),
            }
            Err(e.into())
        }
    }
}

pub async fn redirect_handler(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
    Extension(logger): Extension<RequestLogger>,
    headers: HeaderMap,
) -> Result<Response> {
    redirect(shortcode, &state, &logger, &headers).await
}

/// `GET /shorturls` shares its path with link creation, so the code
/// `shorturls` is resolved here instead of by `/{shortcode}`.
pub async fn shorturls_redirect_handler(
    State(state): State<AppState>,
    Extension(logger): Extension<RequestLogger>,
    headers: HeaderMap,
) -> Result<Response> {
    redirect("shorturls".to_string(), &state, &logger, &headers).await
}

async fn redirect(
    shortcode: String,
    state: &AppState,
    logger: &RequestLogger,
    headers: &HeaderMap,
) -> Result<Response> {
    logger.info(
        "redirect",
        format!("Redirect request for shortcode: {}", shortcode),
    );

    let code = ShortCode::new_unchecked(shortcode);
    let visit = Visit::new(
        header_str(headers, REFERER.as_str()).map(str::to_owned),
        header_str(headers, USER_AGENT.as_str()).map(str::to_owned),
    );
    let referrer = visit.referrer_or_direct().to_string();
    let location = visit.location.clone();

    match state.shortener().resolve(&code, visit).await {
        Ok(original_url) => {
            logger.info(
                "click-tracking",
                format!(
                    "Click tracked for {}: referrer={}, location={}",
                    code, referrer, location
                ),
            );
            logger.info(
                "redirect",
                format!("Successful redirect: {} -> {}", code, original_url),
            );
            Ok((StatusCode::FOUND, [(LOCATION, original_url)]).into_response())
        }
        Err(e) => {
            log_lookup_failure(logger, "redirect", "Redirect", &code, &e);
            Err(e.into())
        }
    }
}

pub async fn analytics_handler(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
    Extension(logger): Extension<RequestLogger>,
) -> Result<Json<AnalyticsResponse>> {
    logger.info(
        "analytics",
        format!("Analytics request for shortcode: {}", shortcode),
    );

    let code = ShortCode::new_unchecked(shortcode);

    match state.shortener().analytics(&code).await {
        Ok(record) => {
            logger.info(
                "analytics",
                format!(
                    "Analytics retrieved for {}: {} clicks",
                    code,
                    record.total_clicks()
                ),
            );
            Ok(Json(AnalyticsResponse::from(record)))
        }
        Err(e) => {
            log_lookup_failure(&logger, "analytics", "Analytics", &code, &e);
            Err(e.into())
        }
    }
}

fn log_lookup_failure(
    logger: &RequestLogger,
    category: &str,
    operation: &str,
    code: &ShortCode,
    error: &ShortenerError,
) {
    match error {
        ShortenerError::NotFound(_) => logger.warn(
            category,
            format!("{} failed: Short link not found - {}", operation, code),
        ),
        ShortenerError::Expired(_) => logger.warn(
            category,
            format!("{} failed: Short link expired - {}", operation, code),
        ),
        other => logger.error(category, format!("{} failed: {} - {}", operation, other, code)),
    }
}
