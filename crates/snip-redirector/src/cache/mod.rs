//! Cache implementations for the read path.

pub mod moka;

pub use self::moka::{MokaCacheConfig, MokaMappingCache};
