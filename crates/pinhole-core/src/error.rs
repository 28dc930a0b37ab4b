use thiserror::Error;

/// Errors related to the core types of the URL shortener service.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors returned by a [`KvStore`](crate::store::KvStore) backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored value is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by [`Resolver`](crate::resolver::Resolver) operations.
///
/// Callers can tell a store outage apart from a collision failure: the
/// former is worth surfacing as "service unavailable", the latter may be
/// retried as a whole later with a fresh attempt sequence.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    #[error("could not allocate a short code after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
}
