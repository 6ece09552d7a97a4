//! Read path of the shortener: resolving short codes and listing history.
//!
//! [`RedirectorService`] resolves a short code to the original URL and
//! [`HistoryReader`] lists stored mappings newest first. Both only need a
//! [`ReadRepository`](snip_core::ReadRepository), which can be wrapped in a
//! [`CachedRepository`] to serve hot codes from memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use snip_redirector::{CachedRepository, MokaMappingCache, Redirector, RedirectorService};
//! use snip_storage::SqliteRepository;
//!
//! let store = SqliteRepository::in_memory().await?;
//! let cached = CachedRepository::new(store, MokaMappingCache::new());
//! let service = RedirectorService::new(cached);
//!
//! match service.resolve("abc123").await? {
//!     Some(url) => println!("Redirect to: {url}"),
//!     None => println!("not found"),
//! }
//! ```

pub mod cache;
pub mod error;
pub mod history;
pub mod redirector;
pub mod repository;
pub mod service;

pub use cache::{MokaCacheConfig, MokaMappingCache};
pub use error::{RedirectorError, Result};
pub use history::HistoryReader;
pub use redirector::Redirector;
pub use repository::CachedRepository;
pub use service::RedirectorService;
