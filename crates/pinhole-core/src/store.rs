use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A string key-value store with an atomic insert-if-absent primitive.
///
/// This is the only coordination point between concurrent resolvers:
/// [`KvStore::set_if_absent`] must be a single atomic operation so that at
/// most one writer wins a given key.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if it is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Stores `value` under `key` only if the key does not exist yet.
    ///
    /// Returns `true` if the value was inserted, `false` if the key was
    /// already taken (the existing value is left untouched).
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        (**self).set_if_absent(key, value).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}
