use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::repository::{ReadRepository, Repository, Result};
use snip_core::{Mapping, MappingId, ShortCode, StorageError};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use typed_builder::TypedBuilder;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub const DEFAULT_DATABASE_URL: &str = "sqlite://snip.db";
pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

/// Connection settings for [`SqliteRepository::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SqliteConfig {
    #[builder(default = DEFAULT_DATABASE_URL.to_string(), setter(into))]
    pub database_url: String,
    #[builder(default = 5)]
    pub max_connections: u32,
    /// How long a caller waits for a pooled connection before the operation
    /// fails with [`StorageError::Timeout`].
    #[builder(default = Duration::from_secs(3))]
    pub acquire_timeout: Duration,
    /// How long SQLite waits on a locked database before giving up.
    #[builder(default = Duration::from_secs(5))]
    pub busy_timeout: Duration,
    #[builder(default = true)]
    pub create_if_missing: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SqliteConfig {
    /// A private in-memory database lives and dies with its connection.
    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

/// SQLite implementation of the repository contract.
///
/// Uniqueness of short codes is enforced by the `UNIQUE` constraint on
/// `mappings.short_code`; a violated constraint on insert is reported as
/// [`StorageError::Conflict`]. Timestamps are stored as Unix milliseconds.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing pool. The schema is not touched;
    /// call [`SqliteRepository::migrate`] if needed.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool per `config` and applies pending migrations.
    pub async fn connect(config: &SqliteConfig) -> Result<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(config.create_if_missing)
            .busy_timeout(config.busy_timeout);

        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout);
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            // Concurrent writers queue on the busy timeout instead of failing
            // outright on lock upgrades.
            options = options.journal_mode(SqliteJournalMode::Wal);
            pool_options = pool_options.max_connections(config.max_connections);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Opens a fresh, private in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self> {
        let config = SqliteConfig::builder()
            .database_url(IN_MEMORY_DATABASE_URL)
            .build();
        Self::connect(&config).await
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.map_err(|err| match err {
            MigrateError::Execute(inner) => map_sqlx_error(inner),
            other => StorageError::Operation(format!("migration failed: {other}")),
        })?;
        debug!("sqlite schema is up to date");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", millis))
    })
}

fn row_to_mapping(row: &SqliteRow) -> Result<Mapping> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    let short_code = ShortCode::new(short_code)
        .map_err(|e| StorageError::InvalidData(format!("row {id}: {e}")))?;

    Ok(Mapping {
        id: MappingId::new(id),
        original_url,
        short_code,
        created_at: parse_created_at(created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6), including their extended codes.
fn is_busy(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, 5 | 6))
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    if is_busy(&err) {
        return StorageError::Timeout(message);
    }

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed | sqlx::Error::Io(_) => {
            StorageError::Unavailable(message)
        }
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM mappings
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_mapping).transpose()
    }

    async fn find_by_original_url(&self, url: &str) -> Result<Option<Mapping>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM mappings
            WHERE original_url = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_mapping).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM mappings
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn list_by_created_desc(&self) -> Result<Vec<Mapping>> {
        let rows = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM mappings
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_mapping).collect()
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<Mapping> {
        let created_at = Timestamp::now().as_millisecond();

        let result = sqlx::query(
            r#"
            INSERT INTO mappings (original_url, short_code, created_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(original_url)
        .bind(code.as_str())
        .bind(created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
                Ok(Mapping {
                    id: MappingId::new(id),
                    original_url: original_url.to_owned(),
                    short_code: code.clone(),
                    created_at: parse_created_at(created_at)?,
                })
            }
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
