//! URL shortener service implementation.
//!
//! This crate provides the [`Shortener`] trait and the registry-backed
//! [`ShortenerService`]. Core types are re-exported from `pinhole_core`.

pub mod error;
pub mod service;
pub mod shortener;
pub mod validate;

pub use error::{Result, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings};
pub use shortener::{ShortenParams, ShortenedLink, Shortener};
pub use validate::validate_url;
