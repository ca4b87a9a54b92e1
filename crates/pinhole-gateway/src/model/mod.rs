mod url;

pub use url::{AnalyticsResponse, CreateLinkRequest, CreateLinkResponse, ErrorResponse};
