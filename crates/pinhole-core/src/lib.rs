//! Core types and traits for the Pinhole URL shortener.
//!
//! This crate provides the link registry abstraction and the record types
//! shared by the storage, shortener and gateway crates.

pub mod clock;
pub mod error;
pub mod record;
pub mod registry;
pub mod shortcode;

pub use clock::{Clock, SystemClock};
pub use error::{CoreError, StorageError};
pub use record::{ClickEvent, LinkRecord, Visit, DIRECT_REFERRER, UNKNOWN_LOCATION};
pub use registry::{LinkRegistry, Lookup};
pub use shortcode::ShortCode;
