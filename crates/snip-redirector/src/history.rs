use std::sync::Arc;

use snip_core::{Mapping, ReadRepository};
use tracing::trace;

/// Lists stored mappings, most recent first.
#[derive(Debug)]
pub struct HistoryReader<R> {
    repository: Arc<R>,
}

impl<R> Clone for HistoryReader<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ReadRepository> HistoryReader<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Returns every mapping ordered by creation time, newest first; mappings
    /// created in the same instant are ordered by insertion, latest first.
    pub async fn list_history(&self) -> crate::Result<Vec<Mapping>> {
        let mappings = self.repository.list_by_created_desc().await?;
        trace!(count = mappings.len(), "listed history");
        Ok(mappings)
    }
}
