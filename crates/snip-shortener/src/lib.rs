//! URL shortener service implementation.
//!
//! This crate provides URL validation and the [`ShortenerService`], which
//! deduplicates submissions and allocates collision-free short codes on top
//! of any [`Repository`](snip_core::Repository) and
//! [`Generator`](snip_generator::Generator). Core types are re-exported from
//! `snip_core`.

pub mod service;
pub mod validate;

pub use service::{ShortenerConfig, ShortenerService, DEFAULT_MAX_ATTEMPTS};
pub use snip_core::{ShortenOutcome, Shortener, ShortenerError};
pub use validate::{validate_url, ALLOWED_SCHEMES};
