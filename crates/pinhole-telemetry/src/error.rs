use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelemetryError>;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("tracing initialization failed: {0}")]
    Init(String),
    #[error("log collector unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("log collector rejected event with status {0}")]
    Rejected(u16),
    #[error("invalid log collector url: {0}")]
    InvalidEndpoint(String),
}
