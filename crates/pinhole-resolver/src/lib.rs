//! Code resolver implementation.
//!
//! This crate provides [`ResolverService`], which turns long URLs into short
//! codes and back on top of any [`KvStore`](pinhole_core::KvStore). Core
//! types are re-exported from `pinhole_core`.

pub mod error;
pub mod service;

pub use error::SettingsError;
pub use pinhole_core::{ResolveError, Resolver, ShortCode};
pub use service::{ResolverService, ResolverSettings, ReverseLink};
