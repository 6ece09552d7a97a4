use std::sync::Arc;

use crate::redirector::Redirector;
use async_trait::async_trait;
use snip_core::{ReadRepository, ShortCode};
use tracing::{debug, trace};

/// Service for resolving short codes.
///
/// Uses a read-only repository to fetch mappings. Input that cannot be a
/// short code is reported as not found without touching the store.
#[derive(Debug)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
}

impl<R> Clone for RedirectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ReadRepository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository.
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Resolves a short code to its original URL.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(url))` - The original URL exactly as it was stored
    /// * `Ok(None)` - If no mapping exists for the code
    /// * `Err(e)` - If there was an error accessing the repository
    pub async fn resolve(&self, code: &str) -> crate::Result<Option<String>> {
        Redirector::resolve(self, code).await
    }
}

#[async_trait]
impl<R: ReadRepository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &str) -> crate::Result<Option<String>> {
        trace!(code = %code, "resolving short code");

        let Ok(code) = ShortCode::new(code) else {
            trace!(code = %code, "input is not a short code");
            return Ok(None);
        };

        match self.repository.find_by_short_code(&code).await? {
            Some(mapping) => {
                debug!(code = %code, url = %mapping.original_url, "resolved short code");
                Ok(Some(mapping.original_url))
            }
            None => {
                trace!(code = %code, "short code not found");
                Ok(None)
            }
        }
    }
}
