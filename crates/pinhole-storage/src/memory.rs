use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use pinhole_core::error::{Result, StorageError};
use pinhole_core::{LinkRecord, LinkRegistry, Lookup, ShortCode, Visit};
use tracing::{debug, trace};

/// In-memory implementation of [`LinkRegistry`] using DashMap.
///
/// DashMap shards its locks, so operations on different codes proceed in
/// parallel while every operation on a single code holds that code's shard
/// lock for its whole read-modify-write.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    storage: DashMap<ShortCode, LinkRecord>,
}

impl InMemoryRegistry {
    /// Creates a new in-memory registry.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory registry with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl LinkRegistry for InMemoryRegistry {
    async fn insert(&self, record: LinkRecord) -> Result<()> {
        match self.storage.entry(record.shortcode.clone()) {
            Entry::Occupied(occupied) => Err(StorageError::Conflict(occupied.key().to_string())),
            Entry::Vacant(vacant) => {
                trace!(code = %record.shortcode, "inserting link");
                vacant.insert(record);
                Ok(())
            }
        }
    }

    async fn visit(
        &self,
        code: &ShortCode,
        visit: Visit,
        now: Timestamp,
    ) -> Result<Lookup<String>> {
        let Some(mut record) = self.storage.get_mut(code) else {
            return Ok(Lookup::Missing);
        };

        if record.is_expired_at(now) {
            return Ok(Lookup::Expired);
        }

        let stamped_at = record
            .clicks
            .last()
            .map_or(now, |last| last.timestamp.max(now));
        record.clicks.push(visit.into_click(stamped_at));

        Ok(Lookup::Found(record.original_url.clone()))
    }

    async fn snapshot(&self, code: &ShortCode, now: Timestamp) -> Result<Lookup<LinkRecord>> {
        let Some(record) = self.storage.get(code) else {
            return Ok(Lookup::Missing);
        };

        if record.is_expired_at(now) {
            return Ok(Lookup::Expired);
        }

        Ok(Lookup::Found(record.clone()))
    }

    async fn evict_expired(&self, code: &ShortCode, now: Timestamp) -> Result<bool> {
        let removed = self
            .storage
            .remove_if(code, |_, record| record.is_expired_at(now))
            .is_some();
        if removed {
            debug!(code = %code, "evicted expired link");
        }
        Ok(removed)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.storage.len())
    }
}
