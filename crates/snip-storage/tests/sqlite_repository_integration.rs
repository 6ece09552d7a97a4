use std::sync::Arc;

use snip_core::ShortCode;
use snip_storage::{ReadRepository, Repository, SqliteConfig, SqliteRepository, StorageError};
use tempfile::TempDir;

struct Fixture {
    repo: SqliteRepository,
}

impl Fixture {
    async fn start() -> Self {
        let repo = SqliteRepository::in_memory()
            .await
            .expect("open in-memory sqlite");
        Self { repo }
    }
}

/// A database file inside a temp dir; the dir and any WAL/SHM files go away
/// on drop.
struct TempDatabase {
    dir: TempDir,
}

impl TempDatabase {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        Self { dir }
    }

    fn config(&self) -> SqliteConfig {
        let path = self.dir.path().join("snip.db");
        SqliteConfig::builder()
            .database_url(format!("sqlite://{}", path.display()))
            .build()
    }
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

#[tokio::test]
async fn insert_and_find_by_code() {
    let fixture = Fixture::start().await;
    let short_code = code("abc123");

    let inserted = fixture
        .repo
        .insert(&short_code, "https://example.com/page")
        .await
        .unwrap();

    let got = fixture
        .repo
        .find_by_short_code(&short_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got, inserted);
    assert_eq!(got.original_url, "https://example.com/page");
}

#[tokio::test]
async fn insert_conflicts_when_code_already_exists() {
    let fixture = Fixture::start().await;
    let short_code = code("abc123");

    fixture
        .repo
        .insert(&short_code, "https://one.example")
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(&short_code, "https://two.example")
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));

    let got = fixture
        .repo
        .find_by_short_code(&short_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got.original_url, "https://one.example");
}

#[tokio::test]
async fn find_by_original_url_is_exact_and_returns_earliest() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&code("first"), "https://dup.example/")
        .await
        .unwrap();
    fixture
        .repo
        .insert(&code("second"), "https://dup.example/")
        .await
        .unwrap();

    let got = fixture
        .repo
        .find_by_original_url("https://dup.example/")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got.short_code.as_str(), "first");

    assert!(fixture
        .repo
        .find_by_original_url("https://dup.example")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn missing_code_is_none() {
    let fixture = Fixture::start().await;

    assert!(fixture
        .repo
        .find_by_short_code(&code("missing"))
        .await
        .unwrap()
        .is_none());
    assert!(!fixture.repo.exists(&code("missing")).await.unwrap());
}

#[tokio::test]
async fn list_is_newest_first_with_id_tiebreak() {
    let fixture = Fixture::start().await;

    for (c, url) in [("a", "https://a.com"), ("b", "https://b.com"), ("c", "https://c.com")] {
        fixture.repo.insert(&code(c), url).await.unwrap();
    }

    let urls: Vec<String> = fixture
        .repo
        .list_by_created_desc()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.original_url)
        .collect();

    assert_eq!(urls, vec!["https://c.com", "https://b.com", "https://a.com"]);
}

#[tokio::test]
async fn closed_pool_reports_unavailable() {
    let fixture = Fixture::start().await;
    fixture.repo.pool().close().await;

    let err = fixture
        .repo
        .find_by_short_code(&code("abc123"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));

    let err = fixture
        .repo
        .insert(&code("abc123"), "https://example.com")
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn mappings_survive_reopening_the_database() {
    let db = TempDatabase::new();

    let inserted = {
        let repo = SqliteRepository::connect(&db.config()).await.unwrap();
        let inserted = repo
            .insert(&code("keep1"), "https://durable.example")
            .await
            .unwrap();
        repo.pool().close().await;
        inserted
    };

    let repo = SqliteRepository::connect(&db.config()).await.unwrap();
    let got = repo.find_by_short_code(&code("keep1")).await.unwrap().unwrap();
    assert_eq!(got, inserted);
    repo.pool().close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_of_one_code_have_a_single_winner() {
    let db = TempDatabase::new();
    let repo = Arc::new(SqliteRepository::connect(&db.config()).await.unwrap());

    let mut handles = vec![];
    for i in 0..16u32 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert(&code("contested"), &format!("https://example{i}.com"))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(StorageError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(repo.list_by_created_desc().await.unwrap().len(), 1);
    repo.pool().close().await;
}
