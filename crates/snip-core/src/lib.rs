//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the shared record type, the short code newtype, the
//! error taxonomy and the storage/cache contracts used by both the
//! shortener (write path) and the redirector (read path).

pub mod cache;
pub mod error;
pub mod mapping;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use cache::MappingCache;
pub use error::{CacheError, CoreError, ShortenerError, StorageError};
pub use mapping::{Mapping, MappingId};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::{ShortenOutcome, Shortener};
