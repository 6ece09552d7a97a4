use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Result of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenOutcome {
    pub short_code: ShortCode,
    /// `true` when the URL had been shortened before and its existing code
    /// was returned instead of minting a new one.
    pub was_existing: bool,
}

impl ShortenOutcome {
    pub fn created(short_code: ShortCode) -> Self {
        Self {
            short_code,
            was_existing: false,
        }
    }

    pub fn existing(short_code: ShortCode) -> Self {
        Self {
            short_code,
            was_existing: true,
        }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates `raw_url` and returns the short code mapped to it, creating
    /// a new mapping when the URL has not been seen before.
    async fn shorten(&self, raw_url: &str) -> Result<ShortenOutcome>;
}
