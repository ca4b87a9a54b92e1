use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// A structured audit event, as sent to the log collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub timestamp: Timestamp,
    pub service: String,
    pub level: LogLevel,
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

impl LogEvent {
    /// Creates an event stamped now, with no request context.
    pub fn new(
        service: impl Into<String>,
        level: LogLevel,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Timestamp::now(),
            service: service.into(),
            level,
            category: category.into(),
            message: message.into(),
            request_id: None,
            method: None,
            url: None,
            user_agent: None,
            ip: None,
        }
    }

    /// `<timestamp> - <SERVICE> - <LEVEL> - <category>: <message>`
    pub fn summary(&self) -> String {
        format!(
            "{} - {} - {} - {}: {}",
            self.timestamp,
            self.service.to_uppercase(),
            self.level.as_str().to_uppercase(),
            self.category,
            self.message
        )
    }

    /// The line written locally when the collector cannot be reached.
    pub fn fallback_line(&self) -> String {
        format!("[FALLBACK] {}", self.summary())
    }
}
