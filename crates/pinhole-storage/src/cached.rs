use async_trait::async_trait;
use moka::future::Cache;
use pinhole_core::store::{KvStore, Result};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Settings for the [`CachedStore`] read-through cache.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CachedStoreSettings {
    /// Maximum number of cached keys.
    #[builder(default = 10_000)]
    pub max_capacity: u64,
}

impl Default for CachedStoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A [`KvStore`] decorator that caches positive reads in memory.
///
/// Mappings are never mutated once written, so a value read from the inner
/// store can be served from memory afterwards. Absent keys are not cached: a
/// code missing now may be reserved a moment later. Writes always go to the
/// inner store and refresh the cache once they succeed.
#[derive(Debug, Clone)]
pub struct CachedStore<S> {
    inner: S,
    cache: Cache<String, String>,
}

impl<S: KvStore> CachedStore<S> {
    /// Wraps `inner` with a cache configured by `settings`.
    pub fn new(inner: S, settings: CachedStoreSettings) -> Self {
        Self {
            inner,
            cache: Cache::new(settings.max_capacity),
        }
    }

    /// Returns a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: KvStore> KvStore for CachedStore<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.cache.get(key).await {
            debug!(key, "Cache hit");
            return Ok(Some(value));
        }

        trace!(key, "Cache miss, fetching from inner store");
        let value = self.inner.get(key).await?;
        if let Some(ref value) = value {
            self.cache.insert(key.to_owned(), value.clone()).await;
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value).await?;
        self.cache.insert(key.to_owned(), value.to_owned()).await;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        let inserted = self.inner.set_if_absent(key, value).await?;
        if inserted {
            self.cache.insert(key.to_owned(), value.to_owned()).await;
        }
        Ok(inserted)
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryStore,
        gets: AtomicUsize,
    }

    #[async_trait]
    impl KvStore for CountingStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value).await
        }

        async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
            self.inner.set_if_absent(key, value).await
        }

        async fn ping(&self) -> Result<()> {
            self.inner.ping().await
        }
    }

    fn cached() -> CachedStore<CountingStore> {
        CachedStore::new(CountingStore::default(), CachedStoreSettings::default())
    }

    #[tokio::test]
    async fn repeated_reads_hit_cache() {
        let store = cached();
        store.inner().inner.set("short:abc", "https://example.com").await.unwrap();

        for _ in 0..3 {
            let value = store.get("short:abc").await.unwrap();
            assert_eq!(value.as_deref(), Some("https://example.com"));
        }

        assert_eq!(store.inner().gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let store = cached();

        assert!(store.get("short:later").await.unwrap().is_none());
        store.inner().inner.set("short:later", "https://later.example").await.unwrap();

        let value = store.get("short:later").await.unwrap();
        assert_eq!(value.as_deref(), Some("https://later.example"));
        assert_eq!(store.inner().gets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn successful_reservation_is_cached() {
        let store = cached();

        assert!(store.set_if_absent("short:abc", "https://example.com").await.unwrap());
        assert!(!store.set_if_absent("short:abc", "https://other.example").await.unwrap());

        let value = store.get("short:abc").await.unwrap();
        assert_eq!(value.as_deref(), Some("https://example.com"));
        assert_eq!(store.inner().gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn set_refreshes_cached_value() {
        let store = cached();

        store.set("url:https://a.example", "abc").await.unwrap();
        store.set("url:https://a.example", "xyz").await.unwrap();

        let value = store.get("url:https://a.example").await.unwrap();
        assert_eq!(value.as_deref(), Some("xyz"));
    }
}
