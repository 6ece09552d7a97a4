use crate::error::StorageError;
use crate::mapping::Mapping;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a mapping store.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing the redirector and the history reader to hold read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the mapping for a given short code.
    /// Returns `None` if the code does not exist.
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Mapping>>;

    /// Retrieves the mapping whose original URL matches `url` byte for byte.
    ///
    /// When several mappings share the URL the earliest one is returned.
    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>>;

    /// Checks whether a short code already exists in the store.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Lists every mapping, newest `created_at` first, later insertions first
    /// among equal timestamps.
    async fn list_by_created_desc(&self) -> Result<Vec<Mapping>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new mapping and returns it with its assigned id and creation
    /// time.
    ///
    /// Returns `Err(Conflict)` if the code already exists. The existence check
    /// and the write are a single atomic step: of two concurrent inserts with
    /// the same code exactly one succeeds.
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<Mapping>;
}

#[async_trait]
impl<T: ReadRepository + ?Sized> ReadRepository for std::sync::Arc<T> {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        (**self).find_by_short_code(code).await
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>> {
        (**self).find_by_original_url(url).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }

    async fn list_by_created_desc(&self) -> Result<Vec<Mapping>> {
        (**self).list_by_created_desc().await
    }
}

#[async_trait]
impl<T: Repository + ?Sized> Repository for std::sync::Arc<T> {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<Mapping> {
        (**self).insert(code, original_url).await
    }
}
