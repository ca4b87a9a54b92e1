use crate::error::{Result, ShortenerError};
use crate::shortener::{ShortenParams, ShortenedLink, Shortener};
use crate::validate::validate_url;
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use pinhole_core::{
    Clock, LinkRecord, LinkRegistry, Lookup, ShortCode, StorageError, SystemClock, Visit,
};
use pinhole_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;
pub const DEFAULT_MAX_GENERATE_ATTEMPTS: usize = 32;

/// Tunables for [`ShortenerService`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerSettings {
    /// Validity applied when the caller gives none (or zero).
    #[builder(default = DEFAULT_VALIDITY_MINUTES)]
    pub default_validity_minutes: u32,
    /// How many generated codes to try before giving up on a create.
    #[builder(default = DEFAULT_MAX_GENERATE_ATTEMPTS)]
    pub max_generate_attempts: usize,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `LinkRegistry`, a `Generator` and a `Clock` to handle:
/// - URL validation
/// - Short code selection (custom alias, or generated with collision retry)
/// - Expiry computation and click recording
#[derive(Debug)]
pub struct ShortenerService<R, G, C = SystemClock> {
    registry: Arc<R>,
    generator: Arc<G>,
    clock: Arc<C>,
    settings: ShortenerSettings,
}

impl<R, G, C> Clone for ShortenerService<R, G, C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            generator: Arc::clone(&self.generator),
            clock: Arc::clone(&self.clock),
            settings: self.settings,
        }
    }
}

impl<R: LinkRegistry, G: Generator> ShortenerService<R, G, SystemClock> {
    /// Creates a new `ShortenerService` backed by the system clock.
    pub fn new(registry: R, generator: G) -> Self {
        Self::with_clock(registry, generator, SystemClock)
    }
}

impl<R: LinkRegistry, G: Generator, C: Clock> ShortenerService<R, G, C> {
    pub fn with_clock(registry: R, generator: G, clock: C) -> Self {
        Self {
            registry: Arc::new(registry),
            generator: Arc::new(generator),
            clock: Arc::new(clock),
            settings: ShortenerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ShortenerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    fn expiry_from(&self, now: Timestamp, validity_minutes: Option<u32>) -> Result<Timestamp> {
        let minutes = match validity_minutes {
            None | Some(0) => self.settings.default_validity_minutes,
            Some(minutes) => minutes,
        };

        now.checked_add(SignedDuration::from_mins(i64::from(minutes)))
            .map_err(|e| {
                ShortenerError::InvalidValidity(format!("{} minutes: {}", minutes, e))
            })
    }

    /// Inserts under freshly generated codes until one is free.
    async fn insert_generated(
        &self,
        original_url: &str,
        now: Timestamp,
        expire_at: Timestamp,
    ) -> Result<ShortCode> {
        let attempts = self.settings.max_generate_attempts.max(1);

        for attempt in 1..=attempts {
            let code: ShortCode = self.generator.generate().into();
            let record = LinkRecord::new(code.clone(), original_url, now, expire_at);

            match self.registry.insert(record).await {
                Ok(()) => return Ok(code),
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %code, attempt, "generated short code already taken, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(attempts, "short code generation exhausted");
        Err(ShortenerError::CodeSpaceExhausted { attempts })
    }

    /// Evicts a record a lookup found expired; the code then reads as missing.
    async fn expired(&self, code: &ShortCode, now: Timestamp) -> ShortenerError {
        if let Err(e) = self.registry.evict_expired(code, now).await {
            warn!(code = %code, error = %e, "failed to evict expired link");
        }
        ShortenerError::Expired(code.to_string())
    }
}

#[async_trait]
impl<R: LinkRegistry, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortenedLink> {
        validate_url(&params.original_url)?;

        let now = self.clock.now();
        let expire_at = self.expiry_from(now, params.validity_minutes)?;

        let shortcode = match params.custom_alias {
            Some(code) => {
                let record = LinkRecord::new(code.clone(), &params.original_url, now, expire_at);
                self.registry.insert(record).await?;
                code
            }
            None => {
                self.insert_generated(&params.original_url, now, expire_at)
                    .await?
            }
        };

        trace!(code = %shortcode, url = %params.original_url, "created short link");

        Ok(ShortenedLink {
            shortcode,
            original_url: params.original_url,
            created_at: now,
            expire_at,
        })
    }

    async fn resolve(&self, code: &ShortCode, visit: Visit) -> Result<String> {
        let now = self.clock.now();
        match self.registry.visit(code, visit, now).await? {
            Lookup::Found(url) => Ok(url),
            Lookup::Missing => Err(ShortenerError::NotFound(code.to_string())),
            Lookup::Expired => Err(self.expired(code, now).await),
        }
    }

    async fn analytics(&self, code: &ShortCode) -> Result<LinkRecord> {
        let now = self.clock.now();
        match self.registry.snapshot(code, now).await? {
            Lookup::Found(record) => Ok(record),
            Lookup::Missing => Err(ShortenerError::NotFound(code.to_string())),
            Lookup::Expired => Err(self.expired(code, now).await),
        }
    }
}
