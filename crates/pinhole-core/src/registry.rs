use crate::error::Result;
use crate::record::{LinkRecord, Visit};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;

/// Outcome of looking up a short code at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The record is live.
    Found(T),
    /// No record is stored under the code.
    Missing,
    /// The record is past its expiry. It stays stored until
    /// [`LinkRegistry::evict_expired`] removes it.
    Expired,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing | Lookup::Expired => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Missing => Lookup::Missing,
            Lookup::Expired => Lookup::Expired,
        }
    }
}

/// A keyed store of short-link records.
///
/// Lookups never hand out a record past its expiry; they report
/// [`Lookup::Expired`] and leave removal to [`LinkRegistry::evict_expired`].
/// There is no background sweep. All mutations are atomic with respect to
/// the short code they touch.
#[async_trait]
pub trait LinkRegistry: Send + Sync + 'static {
    /// Inserts a new record.
    ///
    /// Returns `Err(Conflict)` if any record, live or expired, is stored
    /// under the same code.
    async fn insert(&self, record: LinkRecord) -> Result<()>;

    /// Appends a click for `visit` and returns the original URL.
    ///
    /// The click is stamped no earlier than the record's latest click, so
    /// click timestamps never go backwards.
    async fn visit(&self, code: &ShortCode, visit: Visit, now: Timestamp)
        -> Result<Lookup<String>>;

    /// Returns a copy of the record, clicks included.
    async fn snapshot(&self, code: &ShortCode, now: Timestamp) -> Result<Lookup<LinkRecord>>;

    /// Removes the record if it is expired at `now`.
    ///
    /// A record re-created under the same code in the meantime is left
    /// alone. Returns `true` if a record was removed.
    async fn evict_expired(&self, code: &ShortCode, now: Timestamp) -> Result<bool>;

    /// Number of stored records, expired or not.
    async fn len(&self) -> Result<usize>;
}
