use jiff::Timestamp;
use pinhole_core::{ClickEvent, LinkRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub url: Option<String>,
    /// Validity window in minutes.
    pub validity: Option<u32>,
    pub shortcode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub short_link: String,
    pub expiry: Timestamp,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub shortcode: String,
    pub total_clicks: usize,
    pub original_url: String,
    pub created_at: Timestamp,
    pub expiry: Timestamp,
    pub click_data: Vec<ClickEvent>,
}

impl From<LinkRecord> for AnalyticsResponse {
    fn from(record: LinkRecord) -> Self {
        Self {
            shortcode: record.shortcode.into_inner(),
            total_clicks: record.clicks.len(),
            original_url: record.original_url,
            created_at: record.created_at,
            expiry: record.expire_at,
            click_data: record.clicks,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
