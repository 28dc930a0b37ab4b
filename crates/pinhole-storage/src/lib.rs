//! Key-value store backends for the Pinhole resolver.

pub mod cached;
pub mod memory;
pub mod redis;

pub use cached::{CachedStore, CachedStoreSettings};
pub use memory::InMemoryStore;
pub use pinhole_core::{KvStore, StoreError};
pub use self::redis::{RedisStore, RedisStoreSettings};
