use crate::Generator;
use rand::Rng;
use snip_core::shortcode::MAX_LENGTH;
use snip_core::{CoreError, ShortCode};

/// The 62 symbols a generated code is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Draws every character of a code uniformly at random from [`ALPHABET`].
///
/// With the default length the code space is 62^6 (about 5.6e10), so
/// collisions are rare but possible; callers must still handle them.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }

    /// Creates a generator for codes of `length` characters.
    ///
    /// The length must fit a [`ShortCode`], i.e. be between 1 and 32.
    pub fn with_length(length: usize) -> Result<Self, CoreError> {
        if length == 0 || length > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "generated code length must be between 1 and {MAX_LENGTH}, got {length}"
            )));
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct codes this generator can produce, saturating at
    /// `u64::MAX`.
    pub fn code_space(&self) -> u64 {
        (ALPHABET.len() as u64).saturating_pow(self.length as u32)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::thread_rng();
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn default_length_is_six() {
        let code = RandomGenerator::new().generate();
        assert_eq!(code.as_str().len(), 6);
    }

    #[test]
    fn codes_use_only_the_alphabet() {
        let generator = RandomGenerator::with_length(12).unwrap();
        for _ in 0..200 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 12);
            assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
            // Generated codes must pass the same validation user input does.
            assert!(ShortCode::new(code.as_str()).is_ok());
        }
    }

    #[test]
    fn alphabet_is_62_unique_symbols() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
    }

    #[test]
    fn every_symbol_shows_up() {
        let generator = RandomGenerator::with_length(32).unwrap();
        let mut seen: HashMap<u8, usize> = HashMap::new();
        for _ in 0..2_000 {
            for b in generator.generate().as_str().bytes() {
                *seen.entry(b).or_default() += 1;
            }
        }
        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn consecutive_codes_rarely_repeat() {
        let generator = RandomGenerator::new();
        let codes: HashSet<String> = (0..1_000)
            .map(|_| generator.generate().as_str().to_owned())
            .collect();
        assert!(codes.len() >= 995);
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(RandomGenerator::with_length(0).is_err());
        assert!(RandomGenerator::with_length(33).is_err());
        assert!(RandomGenerator::with_length(32).is_ok());
    }

    #[test]
    fn code_space() {
        assert_eq!(RandomGenerator::new().code_space(), 56_800_235_584);
        assert_eq!(RandomGenerator::with_length(1).unwrap().code_space(), 62);
        assert_eq!(
            RandomGenerator::with_length(32).unwrap().code_space(),
            u64::MAX
        );
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
