use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to the original URL, verbatim.
    /// Returns `None` if no mapping exists for the code.
    async fn resolve(&self, code: &str) -> Result<Option<String>>;
}
