use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Referrer recorded for visits that carried no `Referer` header.
pub const DIRECT_REFERRER: &str = "Direct";

/// Location recorded for every visit. Geolocation is not implemented.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// A short link stored in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub shortcode: ShortCode,
    /// The original URL that was shortened.
    pub original_url: String,
    pub created_at: Timestamp,
    /// The record is expired once the current time is strictly past this instant.
    pub expire_at: Timestamp,
    /// Recorded visits, oldest first. Only ever appended to.
    pub clicks: Vec<ClickEvent>,
}

impl LinkRecord {
    /// Creates a record with an empty click history.
    pub fn new(
        shortcode: ShortCode,
        original_url: impl Into<String>,
        created_at: Timestamp,
        expire_at: Timestamp,
    ) -> Self {
        Self {
            shortcode,
            original_url: original_url.into(),
            created_at,
            expire_at,
            clicks: Vec::new(),
        }
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expire_at
    }

    pub fn total_clicks(&self) -> usize {
        self.clicks.len()
    }
}

/// One recorded visit to a short link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub timestamp: Timestamp,
    pub referrer: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Request metadata describing a visit, before it is stamped into a [`ClickEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub location: String,
}

impl Visit {
    pub fn new(referrer: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            referrer,
            user_agent,
            location: UNKNOWN_LOCATION.to_string(),
        }
    }

    /// Overrides the placeholder location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// The referrer that will be recorded: [`DIRECT_REFERRER`] when missing or empty.
    pub fn referrer_or_direct(&self) -> &str {
        self.referrer
            .as_deref()
            .filter(|referrer| !referrer.is_empty())
            .unwrap_or(DIRECT_REFERRER)
    }

    /// Stamps the visit at `timestamp` with [`Visit::referrer_or_direct`] as the referrer.
    pub fn into_click(self, timestamp: Timestamp) -> ClickEvent {
        let referrer = self.referrer_or_direct().to_string();

        ClickEvent {
            timestamp,
            referrer,
            location: self.location,
            user_agent: self.user_agent,
        }
    }
}

impl Default for Visit {
    fn default() -> Self {
        Self::new(None, None)
    }
}
