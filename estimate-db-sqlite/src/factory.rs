use async_trait::async_trait;
use estimate_core::cache::{CacheConfig, CacheFactory};
use estimate_core::{CacheError, FormCache};

use crate::cache::SqliteFormCache;

/// Maps a configured connection string to a sqlx URL.
///
/// * `""` or `":memory:"` opens an ephemeral in-memory database.
/// * A `sqlite:` URL is used unchanged.
/// * Anything else is a file path, created if missing.
pub fn database_url(connection_string: &str) -> String {
    match connection_string.trim() {
        "" | ":memory:" => "sqlite::memory:".to_string(),
        url if url.starts_with("sqlite:") => url.to_string(),
        path => format!("sqlite:{}?mode=rwc", path),
    }
}

/// [`CacheFactory`] for SQLite.
///
/// Register this with a [`estimate_core::CacheRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use estimate_core::CacheRegistry;
/// use estimate_db_sqlite::SqliteCacheFactory;
///
/// let mut registry = CacheRegistry::with_builtin();
/// registry.register(Box::new(SqliteCacheFactory));
/// ```
pub struct SqliteCacheFactory;

#[async_trait]
impl CacheFactory for SqliteCacheFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, config: &CacheConfig) -> Result<Box<dyn FormCache>, CacheError> {
        let cache = SqliteFormCache::new(&database_url(&config.connection_string)).await?;
        cache.run_migrations().await?;
        Ok(Box::new(cache))
    }
}
