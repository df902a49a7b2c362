//! Storage for the in-progress form.
//!
//! The wizard persists its whole [`FormState`](crate::wizard::FormState) as
//! an opaque JSON payload under [`FORM_DATA_KEY`]. Backends only store and
//! return text.

pub mod factory;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

pub use factory::{CacheConfig, CacheFactory, CacheRegistry, MemoryCacheFactory};
pub use memory::MemoryCache;

/// Key the in-progress form is stored under.
pub const FORM_DATA_KEY: &str = "estimation_form_data";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Serialization(e.to_string())
    }
}

/// Bookkeeping a backend may keep next to a saved payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedForm {
    /// Running total carried by the payload when it was saved. `None` when
    /// the payload was not a form state.
    pub running_total: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait FormCache: Send + Sync {
    /// The payload stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `payload` under `key`, replacing any previous value.
    async fn set(&self, key: &str, payload: &str) -> Result<(), CacheError>;

    /// Removes `key`. Clearing a missing key is not an error.
    async fn clear(&self, key: &str) -> Result<(), CacheError>;

    /// When `key` was last saved and the total it carried. Backends that
    /// keep no bookkeeping return `None`.
    async fn saved_form(&self, _key: &str) -> Result<Option<SavedForm>, CacheError> {
        Ok(None)
    }
}
