use crate::Generator;
use snip_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic generator producing sequential codes like "sn000000",
/// "sn000001", and so on.
///
/// Codes never repeat within one instance, which makes it convenient for
/// tests and for seeding a store with predictable codes. The prefix must be
/// alphanumeric for the output to be a valid [`ShortCode`].
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Starts the counter at `offset`, e.g. to resume after a known code.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(format!("{}{:06}", self.prefix, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_sequential_codes() {
        let generator = SeqGenerator::with_prefix("sn");

        assert_eq!(generator.generate().as_str(), "sn000000");
        assert_eq!(generator.generate().as_str(), "sn000001");
        assert_eq!(generator.generate().as_str(), "sn000002");
    }

    #[test]
    fn with_offset() {
        let generator = SeqGenerator::with_offset("sn", 1000);

        assert_eq!(generator.generate().as_str(), "sn001000");
        assert_eq!(generator.generate().as_str(), "sn001001");
    }

    #[test]
    fn clone_preserves_counter_state() {
        let generator = SeqGenerator::with_prefix("sn");
        generator.generate();
        generator.generate();

        let cloned = generator.clone();

        assert_eq!(generator.generate().as_str(), "sn000002");
        assert_eq!(cloned.generate().as_str(), "sn000002");
    }
}
