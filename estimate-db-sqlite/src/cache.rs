use async_trait::async_trait;
use chrono::{DateTime, Utc};
use estimate_core::{CacheError, FormCache, FormState, SavedForm};
use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use crate::total::{read_total, total_to_real};

pub struct SqliteFormCache {
    pool: SqlitePool,
}

impl SqliteFormCache {
    pub async fn new(database_url: &str) -> Result<Self, CacheError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), CacheError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, CacheError> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|e| CacheError::Storage(format!("Failed to parse datetime '{}': {}", s, e)))
}

/// Running total of a serialized form state, if the payload is one.
fn payload_total(payload: &str) -> Option<f64> {
    serde_json::from_str::<FormState>(payload)
        .ok()
        .and_then(|state| total_to_real(state.running_total()))
}

#[async_trait]
impl FormCache for SqliteFormCache {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, CacheError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT payload FROM form_cache WHERE cache_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        Ok(row.map(|(payload,)| payload))
    }

    async fn set(
        &self,
        key: &str,
        payload: &str,
    ) -> Result<(), CacheError> {
        let updated_at = Utc::now().format("%Y-%m-%d %H:%M:%S%.f").to_string();

        sqlx::query(
            "INSERT INTO form_cache (cache_key, payload, running_total, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(cache_key) DO UPDATE SET
                payload = excluded.payload,
                running_total = excluded.running_total,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(payload)
        .bind(payload_total(payload))
        .bind(&updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| CacheError::Storage(e.to_string()))?;

        debug!(key, bytes = payload.len(), "form cached");
        Ok(())
    }

    async fn clear(
        &self,
        key: &str,
    ) -> Result<(), CacheError> {
        sqlx::query("DELETE FROM form_cache WHERE cache_key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn saved_form(
        &self,
        key: &str,
    ) -> Result<Option<SavedForm>, CacheError> {
        let row = sqlx::query("SELECT running_total, updated_at FROM form_cache WHERE cache_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|e| CacheError::Storage(e.to_string()))?;

        Ok(Some(SavedForm {
            running_total: read_total(&row, "running_total")?,
            updated_at: parse_datetime(&updated_at)?,
        }))
    }
}
