use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pinhole_shortener::ShortenerError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The request body could not be parsed.
    BadRequest(String),
    Shortener(ShortenerError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Shortener(e) => match e {
                ShortenerError::MissingUrl
                | ShortenerError::InvalidUrl(_)
                | ShortenerError::InvalidValidity(_) => StatusCode::BAD_REQUEST,
                ShortenerError::AliasConflict(_) => StatusCode::CONFLICT,
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::Expired(_) => StatusCode::GONE,
                ShortenerError::CodeSpaceExhausted { .. } | ShortenerError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// The message returned to the client.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(message) => message.clone(),
            AppError::Shortener(e) => match e {
                ShortenerError::MissingUrl => "URL is required".to_string(),
                ShortenerError::InvalidUrl(_) => "Invalid URL format".to_string(),
                ShortenerError::InvalidValidity(_) => "Invalid validity".to_string(),
                ShortenerError::AliasConflict(_) => {
                    "Requested shortcode is already in use".to_string()
                }
                ShortenerError::NotFound(_) => "Short link not found".to_string(),
                ShortenerError::Expired(_) => "Short link has expired".to_string(),
                ShortenerError::CodeSpaceExhausted { .. } | ShortenerError::Storage(_) => {
                    "Internal server error".to_string()
                }
            },
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        AppError::Shortener(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            if let AppError::Shortener(e) = &self {
                error!(error = %e, "request failed");
            }
        }

        (status, Json(ErrorResponse { error: self.message() })).into_response()
    }
}
