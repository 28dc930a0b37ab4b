//! Core types and traits for the Pinhole URL shortener.
//!
//! This crate provides the types shared by the resolver, the storage
//! backends and the HTTP gateway: the base-62 [`ShortCode`], the
//! [`KvStore`] contract the resolver runs against, and the [`Resolver`]
//! service surface.

pub mod base62;
pub mod error;
pub mod keyspace;
pub mod resolver;
pub mod shortcode;
pub mod store;

pub use error::{CoreError, ResolveError, StoreError};
pub use keyspace::KeySpace;
pub use resolver::Resolver;
pub use shortcode::ShortCode;
pub use store::KvStore;
