//! HTTP gateway for the Pinhole URL shortener.
//!
//! Exposes the [`Resolver`](pinhole_core::Resolver) over HTTP: a JSON API to
//! shorten URLs, `302` redirects for short codes, a health probe and the
//! embedded front page.

pub mod accept;
pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod pages;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use state::AppState;
