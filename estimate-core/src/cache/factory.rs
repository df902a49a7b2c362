use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CacheError, FormCache, MemoryCache};

/// Backend-agnostic cache configuration.
///
/// `backend` must match the [`CacheFactory::backend_name`] of a registered
/// factory. `connection_string` is passed through to that factory unchanged.
///
/// | backend  | connection_string examples          |
/// |----------|-------------------------------------|
/// | `memory` | ignored                             |
/// | `sqlite` | `estimate.db`, `sqlite::memory:`    |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"sqlite"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: String::new(),
        }
    }
}

/// One implementation per cache backend, registered with a
/// [`CacheRegistry`] at startup.
#[async_trait]
pub trait CacheFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the store and return a ready-to-use cache.
    async fn create(&self, config: &CacheConfig) -> Result<Box<dyn FormCache>, CacheError>;
}

/// Factory for [`MemoryCache`].
pub struct MemoryCacheFactory;

#[async_trait]
impl CacheFactory for MemoryCacheFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, _config: &CacheConfig) -> Result<Box<dyn FormCache>, CacheError> {
        Ok(Box::new(MemoryCache::new()))
    }
}

/// Registry of [`CacheFactory`] instances, keyed by backend name.
pub struct CacheRegistry {
    factories: HashMap<&'static str, Box<dyn CacheFactory>>,
}

impl CacheRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the in-process backends already registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MemoryCacheFactory));
        registry
    }

    /// Register a backend factory, replacing any factory with the same name.
    pub fn register(&mut self, factory: Box<dyn CacheFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend`.
    ///
    /// # Errors
    /// * [`CacheError::Configuration`] when no factory is registered for the
    ///   requested backend name.
    /// * Any error the chosen factory itself returns.
    pub async fn create(&self, config: &CacheConfig) -> Result<Box<dyn FormCache>, CacheError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                CacheError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::{CacheConfig, CacheError, CacheFactory, CacheRegistry, FormCache, MemoryCache};

    /// A factory whose `create` flips an `AtomicBool`, so tests can prove
    /// that it was actually called.
    struct StubFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CacheFactory for StubFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(&self, _config: &CacheConfig) -> Result<Box<dyn FormCache>, CacheError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(MemoryCache::new()))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl CacheFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn create(&self, _config: &CacheConfig) -> Result<Box<dyn FormCache>, CacheError> {
            Err(CacheError::Connection("intentional failure".to_string()))
        }
    }

    fn stub_factory(name: &'static str) -> (Box<dyn CacheFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(StubFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config(backend: &str) -> CacheConfig {
        CacheConfig {
            backend: backend.to_string(),
            connection_string: "x".to_string(),
        }
    }

    // ── CacheConfig ──────────────────────────────────────────────────────
    #[test]
    fn default_config_is_memory() {
        let cfg = CacheConfig::default();
        assert_eq!(cfg.backend, "memory");
        assert_eq!(cfg.connection_string, "");
    }

    // ── registration ─────────────────────────────────────────────────────
    #[test]
    fn new_registry_has_no_backends() {
        assert!(CacheRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn builtin_registry_has_memory() {
        assert_eq!(CacheRegistry::with_builtin().available_backends(), vec!["memory"]);
    }

    #[test]
    fn available_backends_is_sorted() {
        let mut reg = CacheRegistry::new();
        let (f1, _) = stub_factory("sqlite");
        let (f2, _) = stub_factory("memory");
        reg.register(f1);
        reg.register(f2);
        assert_eq!(reg.available_backends(), vec!["memory", "sqlite"]);
    }

    #[test]
    fn duplicate_registration_replaces_previous() {
        let mut reg = CacheRegistry::new();
        let (old, _) = stub_factory("sqlite");
        let (new, _) = stub_factory("sqlite");
        reg.register(old);
        reg.register(new);
        assert_eq!(reg.available_backends(), vec!["sqlite"]);
    }

    // ── dispatch ─────────────────────────────────────────────────────────
    #[tokio::test]
    async fn create_calls_matching_factory_only() {
        let mut reg = CacheRegistry::new();
        let (sqlite, sqlite_called) = stub_factory("sqlite");
        let (memory, memory_called) = stub_factory("memory");
        reg.register(sqlite);
        reg.register(memory);

        let result = reg.create(&config("sqlite")).await;

        assert!(result.is_ok(), "expected Ok, got {:#?}", result.err());
        assert!(sqlite_called.load(Ordering::SeqCst));
        assert!(!memory_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_names_requested_and_available() {
        let reg = CacheRegistry::with_builtin();

        match reg.create(&config("redis")).await {
            Err(CacheError::Configuration(msg)) => {
                assert!(msg.contains("redis"), "error should name the requested backend");
                assert!(msg.contains("memory"), "error should list available backends");
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a cache"),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = CacheRegistry::new();
        reg.register(Box::new(FailingFactory));

        assert_eq!(
            reg.create(&config("failing")).await.err(),
            Some(CacheError::Connection("intentional failure".to_string()))
        );
    }
}
