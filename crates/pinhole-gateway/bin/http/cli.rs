use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "PINHOLE_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "PINHOLE_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "PINHOLE_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "PINHOLE_REDIS_URL";
pub const STORE_TIMEOUT_MS_ENV: &str = "PINHOLE_STORE_TIMEOUT_MS";
pub const MAX_ATTEMPTS_ENV: &str = "PINHOLE_MAX_ATTEMPTS";
pub const KEY_NAMESPACE_ENV: &str = "PINHOLE_KEY_NAMESPACE";
pub const LOOKUP_CACHE_CAPACITY_ENV: &str = "PINHOLE_LOOKUP_CACHE_CAPACITY";
pub const LOG_FORMAT_ENV: &str = "PINHOLE_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "redis")]
    Redis,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Redis => write!(f, "redis"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pinhole-gateway", version, about = "Pinhole URL shortener HTTP gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public base URL that short links are built on.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Redis
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    /// Timeout for connecting to the store and for every store command.
    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = 2000)]
    pub store_timeout_ms: u64,

    /// Candidate codes tried before a shorten request fails.
    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    /// Prefix prepended to every store key.
    #[arg(long, env = KEY_NAMESPACE_ENV)]
    pub key_namespace: Option<String>,

    /// Entries kept by the in-process lookup cache; 0 disables it.
    #[arg(long, env = LOOKUP_CACHE_CAPACITY_ENV, default_value_t = 10_000)]
    pub lookup_cache_capacity: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}
