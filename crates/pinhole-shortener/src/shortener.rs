use crate::error::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use pinhole_core::{LinkRecord, ShortCode, Visit};

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, Default)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// Optional custom alias for the shortened URL.
    pub custom_alias: Option<ShortCode>,
    /// Validity window in minutes. `None` or `Some(0)` selects the default.
    pub validity_minutes: Option<u32>,
}

/// A freshly created short link.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenedLink {
    pub shortcode: ShortCode,
    pub original_url: String,
    pub created_at: Timestamp,
    pub expire_at: Timestamp,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL and returns the created link.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortenedLink>;

    /// Records a visit to `code` and returns the URL to redirect to.
    async fn resolve(&self, code: &ShortCode, visit: Visit) -> Result<String>;

    /// Returns the stored record, click history included, without recording a visit.
    async fn analytics(&self, code: &ShortCode) -> Result<LinkRecord>;
}
