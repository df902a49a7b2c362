//! SQLite backend for the estimation form cache.

mod cache;
mod factory;
mod total;

pub use cache::SqliteFormCache;
pub use factory::{SqliteCacheFactory, database_url};
