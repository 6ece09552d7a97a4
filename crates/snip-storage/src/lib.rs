//! Mapping stores: an in-memory store for tests and single-process use, and
//! a durable SQLite store.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use snip_core::repository::{ReadRepository, Repository};
pub use snip_core::StorageError;
pub use sqlite::{SqliteConfig, SqliteRepository, DEFAULT_DATABASE_URL, IN_MEMORY_DATABASE_URL};
