use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ResolveError>;

/// Bidirectional mapping between long URLs and short codes.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Returns the short code for `long_url`, minting one if the URL has
    /// never been shortened. Repeated calls with the same URL return the
    /// same code.
    async fn resolve(&self, long_url: &str) -> Result<ShortCode>;

    /// Returns the long URL that `code` maps to.
    /// Returns `None` if the code was never reserved.
    async fn lookup(&self, code: &ShortCode) -> Result<Option<String>>;
}
