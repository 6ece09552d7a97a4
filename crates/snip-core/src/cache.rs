use crate::error::CacheError;
use crate::mapping::Mapping;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache for mappings keyed by short code.
///
/// Mappings are immutable once stored, so a cached entry never goes stale;
/// implementations only bound memory through capacity or expiry policies.
/// Absence is never cached.
#[async_trait]
pub trait MappingCache: Send + Sync + 'static {
    /// Get a mapping from the cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, code: &ShortCode) -> Result<Option<Mapping>>;

    /// Store a mapping in the cache.
    async fn insert(&self, mapping: &Mapping) -> Result<()>;
}
