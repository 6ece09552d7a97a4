use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use snip_core::repository::{ReadRepository, Repository, Result};
use snip_core::{Mapping, MappingId, ShortCode, StorageError};
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Inserts go through `DashMap::entry`, so deciding that a code is free and
/// claiming it happen under the same shard lock. A secondary map indexes
/// each original URL to its earliest mapping.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    by_code: DashMap<String, Mapping>,
    by_url: DashMap<String, (MappingId, ShortCode)>,
    last_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        Ok(self.by_code.get(code.as_str()).map(|entry| entry.value().clone()))
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>> {
        // Release the index guard before touching `by_code`; `insert` locks
        // the maps in the opposite order.
        let Some(code) = self.by_url.get(url).map(|entry| entry.value().1.clone()) else {
            return Ok(None);
        };
        Ok(self.by_code.get(code.as_str()).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.by_code.contains_key(code.as_str()))
    }

    async fn list_by_created_desc(&self) -> Result<Vec<Mapping>> {
        let mut mappings: Vec<Mapping> =
            self.by_code.iter().map(|entry| entry.value().clone()).collect();
        mappings.sort_by(Mapping::newest_first);
        Ok(mappings)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<Mapping> {
        let mapping = match self.by_code.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                let mapping = Mapping {
                    id: MappingId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1),
                    original_url: original_url.to_owned(),
                    short_code: code.clone(),
                    created_at: Timestamp::now(),
                };
                slot.insert(mapping.clone());
                mapping
            }
        };

        self.by_url
            .entry(original_url.to_owned())
            .and_modify(|first| {
                if mapping.id < first.0 {
                    *first = (mapping.id, code.clone());
                }
            })
            .or_insert_with(|| (mapping.id, code.clone()));

        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn insert_and_find_by_code() {
        let repo = InMemoryRepository::new();

        let inserted = repo
            .insert(&code("abc123"), "https://example.com")
            .await
            .unwrap();
        assert_eq!(inserted.id, MappingId::new(1));

        let found = repo.find_by_short_code(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(found, inserted);
        assert_eq!(found.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn find_nonexistent() {
        let repo = InMemoryRepository::new();

        assert!(repo.find_by_short_code(&code("nope")).await.unwrap().is_none());
        assert!(repo
            .find_by_original_url("https://nope.example")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn insert_conflict() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        let err = repo
            .insert(&code("abc123"), "https://other.com")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(c) if c == "abc123"));

        // The original mapping is untouched.
        let found = repo.find_by_short_code(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(found.original_url, "https://example.com");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn find_by_original_url_is_exact() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123"), "https://example.com/")
            .await
            .unwrap();

        assert!(repo
            .find_by_original_url("https://example.com/")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_original_url("https://example.com")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_original_url("HTTPS://EXAMPLE.COM/")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn find_by_original_url_returns_earliest() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("first"), "https://dup.example").await.unwrap();
        repo.insert(&code("second"), "https://dup.example").await.unwrap();

        let found = repo
            .find_by_original_url("https://dup.example")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.short_code.as_str(), "first");
    }

    #[tokio::test]
    async fn exists_checks() {
        let repo = InMemoryRepository::new();

        assert!(!repo.exists(&code("abc123")).await.unwrap());

        repo.insert(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        assert!(repo.exists(&code("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("a"), "https://a.com").await.unwrap();
        repo.insert(&code("b"), "https://b.com").await.unwrap();
        repo.insert(&code("c"), "https://c.com").await.unwrap();

        let codes: Vec<String> = repo
            .list_by_created_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.short_code.to_string())
            .collect();
        assert_eq!(codes, vec!["c", "b", "a"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_one_code_have_a_single_winner() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..32u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(&code("contested"), &format!("https://example{i}.com"))
                    .await
            }));
        }

        let mut winners = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(StorageError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(conflicts, 31);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_access() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code{:03}", i));
                repo.insert(&c, &format!("https://example{}.com", i))
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let listed = repo.list_by_created_desc().await.unwrap();
        assert_eq!(listed.len(), 10);

        let mut ids: Vec<i64> = listed.iter().map(|m| m.id.get()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());

        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code{:03}", i));
            let found = repo.find_by_short_code(&c).await.unwrap().unwrap();
            assert_eq!(found.original_url, format!("https://example{}.com", i));
        }
    }
}
