pub mod random;
pub mod seq;

pub use random::{RandomGenerator, ALPHABET, DEFAULT_CODE_LENGTH};
pub use seq::SeqGenerator;

use snip_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// A generated code is only a candidate: uniqueness is enforced by the store
/// on insert, and the caller retries with a fresh candidate on conflict.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Produces the next candidate code. Must never run dry.
    fn generate(&self) -> Self::Output;
}
