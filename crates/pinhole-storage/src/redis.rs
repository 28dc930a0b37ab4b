use async_trait::async_trait;
use pinhole_core::store::{KvStore, Result};
use pinhole_core::StoreError;
use redis::{AsyncCommands, RedisError, RedisResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for [`RedisStore::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisStoreSettings {
    /// Redis connection URL, e.g. `redis://localhost:6379/0`.
    #[builder(setter(into))]
    pub url: String,

    /// Upper bound for connection setup and for every single command.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

/// A Redis-backed implementation of [`KvStore`].
///
/// [`KvStore::set_if_absent`] maps to `SETNX`, a single atomic round-trip,
/// so concurrent resolvers on any number of nodes cannot both reserve the
/// same code. Every command is bounded by the configured timeout since the
/// multiplexed connection does not time out on its own.
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    timeout: Duration,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn map_redis_error(operation: &str, err: RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StoreError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

async fn with_timeout<T, F>(operation: &str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(map_redis_error(operation, err)),
        Err(_) => Err(StoreError::Timeout(format!(
            "{operation}: no reply within {limit:?}"
        ))),
    }
}

impl RedisStore {
    /// Creates a store from an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Opens a multiplexed connection to the configured Redis server.
    pub async fn connect(settings: RedisStoreSettings) -> Result<Self> {
        let client = redis::Client::open(settings.url.as_str())
            .map_err(|e| map_redis_error("invalid redis url", e))?;

        let conn = with_timeout(
            "failed to connect to Redis",
            settings.timeout,
            client.get_multiplexed_async_connection(),
        )
        .await?;

        debug!(timeout = ?settings.timeout, "Connected to Redis");
        Ok(Self::new(conn, settings.timeout))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(key, "GET");

        let mut conn = self.conn.clone();
        with_timeout(
            "failed to fetch value from Redis",
            self.timeout,
            conn.get::<_, Option<String>>(key),
        )
        .await
        .inspect_err(|e| warn!(key, error = %e, "Redis error on get"))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        trace!(key, "SET");

        let mut conn = self.conn.clone();
        with_timeout(
            "failed to write value to Redis",
            self.timeout,
            conn.set::<_, _, ()>(key, value),
        )
        .await
        .inspect_err(|e| warn!(key, error = %e, "Redis error on set"))
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        trace!(key, "SETNX");

        let mut conn = self.conn.clone();
        with_timeout(
            "failed to reserve key in Redis",
            self.timeout,
            conn.set_nx::<_, _, bool>(key, value),
        )
        .await
        .inspect_err(|e| warn!(key, error = %e, "Redis error on setnx"))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let pong: String = with_timeout(
            "failed to ping Redis",
            self.timeout,
            redis::cmd("PING").query_async(&mut conn),
        )
        .await?;

        trace!(reply = %pong, "PING");
        Ok(())
    }
}
