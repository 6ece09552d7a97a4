use snip_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedirectorError>;

/// Failures of the read path. A code that is simply not stored is not an
/// error; lookups report it as `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum RedirectorError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for RedirectorError {
    fn from(value: StorageError) -> Self {
        if value.is_unavailable() {
            return Self::StoreUnavailable(value.to_string());
        }
        Self::Storage(value.to_string())
    }
}
