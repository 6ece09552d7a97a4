use thiserror::Error;

/// Errors related to the core value types of the URL shortener.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors surfaced by a mapping store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The short code is already taken. Only `insert` produces this.
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Whether the failure comes from the backend being unreachable or slow,
    /// as opposed to a bad query or bad data.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors returned by [`Shortener::shorten`](crate::Shortener::shorten).
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("no free short code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        if value.is_unavailable() {
            return Self::StoreUnavailable(value.to_string());
        }
        Self::Storage(value.to_string())
    }
}
