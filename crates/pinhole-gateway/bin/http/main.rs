mod cli;

use crate::cli::{LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use pinhole_core::{KeySpace, KvStore};
use pinhole_gateway::{App, AppState};
use pinhole_generator::HashGenerator;
use pinhole_resolver::{ResolverService, ResolverSettings};
use pinhole_storage::{
    CachedStore, CachedStoreSettings, InMemoryStore, RedisStore, RedisStoreSettings,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        "Starting pinhole gateway"
    );

    let store = build_store(&config).await?;
    store
        .ping()
        .await
        .context("store did not answer PING, refusing to start")?;
    info!("Connected to store");

    let key_space = match &config.key_namespace {
        Some(namespace) => KeySpace::with_namespace(namespace),
        None => KeySpace::default(),
    };
    let settings = ResolverSettings::builder()
        .max_attempts(config.max_attempts)
        .key_space(key_space)
        .build();
    let resolver =
        ResolverService::with_settings(Arc::clone(&store), HashGenerator::default(), settings)?;

    let state = AppState::new(Arc::new(resolver), store, config.base_url);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormatArg::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormatArg::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn build_store(config: &CLI) -> anyhow::Result<Arc<dyn KvStore>> {
    let store: Arc<dyn KvStore> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(InMemoryStore::new()),
        StorageBackendArg::Redis => {
            let settings = RedisStoreSettings::builder()
                .url(config.redis_url.as_str())
                .timeout(Duration::from_millis(config.store_timeout_ms))
                .build();
            let store = RedisStore::connect(settings)
                .await
                .with_context(|| format!("failed to connect to redis at {}", config.redis_url))?;
            Arc::new(store)
        }
    };

    if config.lookup_cache_capacity == 0 {
        return Ok(store);
    }

    info!(capacity = config.lookup_cache_capacity, "Lookup cache enabled");
    let settings = CachedStoreSettings::builder()
        .max_capacity(config.lookup_cache_capacity)
        .build();
    Ok(Arc::new(CachedStore::new(store, settings)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
