use crate::validate::validate_url;
use async_trait::async_trait;
use snip_core::{Repository, ShortCode, ShortenOutcome, Shortener, ShortenerError, StorageError};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Candidate codes tried per shorten call before giving up.
///
/// At the default code length the chance of this many consecutive
/// collisions is negligible; hitting the limit means the code length is too
/// small for the number of stored mappings.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerConfig {
    /// Upper bound on candidate codes per call. Zero is treated as one.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation
/// - Deduplication of previously shortened URLs
/// - Candidate generation with retry on collision
///
/// The existence pre-check only saves a round trip on obvious collisions.
/// Uniqueness is decided by the repository's atomic insert, and a
/// [`StorageError::Conflict`] from it is retried with a fresh candidate.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    config: ShortenerConfig,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            config: self.config.clone(),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with the default retry budget.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_config(repository, generator, ShortenerConfig::default())
    }

    pub fn with_config(repository: R, generator: G, config: ShortenerConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            config,
        }
    }

    fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    fn generate_code(&self) -> ShortCode {
        self.generator.generate().into()
    }

    /// Allocates a fresh code for `original_url` and stores the mapping.
    async fn create(&self, original_url: &str) -> Result<ShortCode, ShortenerError> {
        let max_attempts = self.max_attempts();

        for attempt in 1..=max_attempts {
            let candidate = self.generate_code();

            if self.repository.exists(&candidate).await? {
                debug!(code = %candidate, attempt, "candidate code already taken");
                continue;
            }

            match self.repository.insert(&candidate, original_url).await {
                Ok(mapping) => {
                    debug!(
                        code = %mapping.short_code,
                        id = %mapping.id,
                        attempt,
                        "stored new mapping"
                    );
                    return Ok(mapping.short_code);
                }
                Err(StorageError::Conflict(code)) => {
                    warn!(code = %code, attempt, "lost insert race for candidate code");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(attempts = max_attempts, "exhausted candidate codes");
        Err(ShortenerError::CodeSpaceExhausted {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, raw_url: &str) -> Result<ShortenOutcome, ShortenerError> {
        let original_url = raw_url.trim();
        validate_url(original_url)?;

        trace!(url = %original_url, "looking up existing mapping");
        if let Some(existing) = self.repository.find_by_original_url(original_url).await? {
            debug!(code = %existing.short_code, url = %original_url, "url already shortened");
            return Ok(ShortenOutcome::existing(existing.short_code));
        }

        let code = self.create(original_url).await?;
        Ok(ShortenOutcome::created(code))
    }
}
