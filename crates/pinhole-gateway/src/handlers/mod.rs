mod health;
mod page;
mod url;

pub use health::health_handler;
pub use page::{index_handler, not_found_handler};
pub use url::{redirect_handler, shorten_handler};
