use async_trait::async_trait;
use moka::future::Cache;
use snip_core::cache::Result;
use snip_core::{Mapping, MappingCache, ShortCode};
use std::time::Duration;
use tracing::trace;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory mapping cache backed by Moka.
///
/// Cloning is cheap and clones share the same underlying cache.
#[derive(Debug, Clone)]
pub struct MokaMappingCache {
    cache: Cache<String, Mapping>,
}

impl MokaMappingCache {
    /// Creates a cache holding at most [`DEFAULT_MAX_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> MokaCacheConfigBuilder {
        MokaCacheConfig::builder()
    }
}

impl Default for MokaMappingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingCache for MokaMappingCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        let hit = self.cache.get(code.as_str()).await;
        trace!(code = %code, hit = hit.is_some(), "moka lookup");
        Ok(hit)
    }

    async fn insert(&self, mapping: &Mapping) -> Result<()> {
        self.cache
            .insert(mapping.short_code.to_string(), mapping.clone())
            .await;
        trace!(code = %mapping.short_code, "cached mapping in moka");
        Ok(())
    }
}

/// Configuration for creating a [`MokaMappingCache`] with custom settings.
#[derive(Debug, Clone, TypedBuilder)]
pub struct MokaCacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_MAX_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

impl From<MokaCacheConfig> for MokaMappingCache {
    fn from(config: MokaCacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaMappingCache {
            cache: builder.build(),
        }
    }
}
