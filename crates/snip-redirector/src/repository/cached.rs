use async_trait::async_trait;
use snip_core::repository::Result;
use snip_core::{Mapping, MappingCache, ReadRepository, Repository, ShortCode};
use tracing::{debug, trace, warn};

/// A repository decorator that serves short code lookups from a cache.
///
/// Lookups by code check the cache first and fall back to the inner
/// repository; a found mapping is cached on the way out. Misses are not
/// cached, so a code stored after a miss is visible on the next lookup.
/// Cache failures are logged and bypassed, never surfaced.
///
/// URL lookups and history listings go straight to the inner repository.
#[derive(Debug, Clone)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
}

impl<R: ReadRepository, C: MappingCache> CachedRepository<R, C> {
    /// Creates a new cached repository decorator.
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying repository implementation
    /// * `cache` - The cache implementation (e.g., [`MokaMappingCache`](crate::MokaMappingCache))
    pub fn new(inner: R, cache: C) -> Self {
        Self { inner, cache }
    }

    async fn cached(&self, code: &ShortCode) -> Option<Mapping> {
        match self.cache.get(code).await {
            Ok(Some(mapping)) => {
                debug!(code = %code, "cache hit");
                Some(mapping)
            }
            Ok(None) => {
                trace!(code = %code, "cache miss");
                None
            }
            Err(e) => {
                warn!(code = %code, error = %e, "cache error on lookup, falling back to inner repository");
                None
            }
        }
    }

    async fn remember(&self, mapping: &Mapping) {
        if let Err(e) = self.cache.insert(mapping).await {
            warn!(code = %mapping.short_code, error = %e, "failed to cache mapping");
        }
    }
}

#[async_trait]
impl<R: ReadRepository, C: MappingCache> ReadRepository for CachedRepository<R, C> {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        if let Some(mapping) = self.cached(code).await {
            return Ok(Some(mapping));
        }

        let found = self.inner.find_by_short_code(code).await?;
        if let Some(ref mapping) = found {
            self.remember(mapping).await;
        }
        Ok(found)
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>> {
        self.inner.find_by_original_url(url).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        if self.cached(code).await.is_some() {
            return Ok(true);
        }
        self.inner.exists(code).await
    }

    async fn list_by_created_desc(&self) -> Result<Vec<Mapping>> {
        self.inner.list_by_created_desc().await
    }
}

#[async_trait]
impl<R: Repository, C: MappingCache> Repository for CachedRepository<R, C> {
    /// Inserts through to the inner repository and warms the cache with the
    /// new mapping.
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<Mapping> {
        let mapping = self.inner.insert(code, original_url).await?;
        self.remember(&mapping).await;
        Ok(mapping)
    }
}
