use crate::error::SettingsError;
use async_trait::async_trait;
use pinhole_core::{KeySpace, KvStore, ResolveError, Resolver, ShortCode, StoreError};
use pinhole_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;
use url::Url;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// How the reverse mapping (`url:<long URL>` → code) is written once a code
/// has been reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverseLink {
    /// Claim the reverse key with set-if-absent. If a concurrent resolve of
    /// the same URL got there first, adopt its code so every caller sees one
    /// canonical code per URL.
    #[default]
    FirstWins,
    /// Write the reverse key with a plain set; the last writer wins.
    Overwrite,
}

/// Tunables of a [`ResolverService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ResolverSettings {
    /// Upper bound on candidates tried before giving up with
    /// [`ResolveError::AllocationExhausted`].
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Key layout of the forward and reverse mappings.
    #[builder(default)]
    pub key_space: KeySpace,

    #[builder(default)]
    pub reverse_link: ReverseLink,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ResolverSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_attempts == 0 {
            return Err(SettingsError::ZeroAttempts);
        }
        Ok(())
    }
}

/// A concrete implementation of the [`Resolver`] trait.
///
/// This service wraps a [`KvStore`] and a [`Generator`] to handle:
/// - URL validation
/// - Idempotent reuse of a URL's existing code
/// - Atomic reservation of fresh candidates with bounded retries
///
/// The service keeps no mutable state of its own; the store's
/// set-if-absent is the only point where concurrent calls coordinate.
#[derive(Debug)]
pub struct ResolverService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: ResolverSettings,
}

impl<S, G> Clone for ResolverService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<S: KvStore, G: Generator> ResolverService<S, G> {
    /// Creates a new `ResolverService` with default settings.
    pub fn new(store: S, generator: G) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            settings: ResolverSettings::default(),
        }
    }

    /// Creates a new `ResolverService` with custom settings.
    pub fn with_settings(
        store: S,
        generator: G,
        settings: ResolverSettings,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            settings,
        })
    }

    /// Validates that the URL is an absolute http(s) URL with a host.
    fn validate_url(long_url: &str) -> Result<(), ResolveError> {
        if long_url.is_empty() {
            return Err(ResolveError::InvalidUrl("URL cannot be empty".to_string()));
        }

        let parsed = Url::parse(long_url)
            .map_err(|e| ResolveError::InvalidUrl(format!("{long_url}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ResolveError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        match parsed.host_str() {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(ResolveError::InvalidUrl(format!(
                "URL must have a host: {long_url}"
            ))),
        }
    }

    /// Reserves the first free candidate for `long_url`.
    ///
    /// A candidate already held by `long_url` itself (left behind when an
    /// earlier reverse-link write was lost, or reserved by a concurrent call
    /// for the same URL) is reused instead of counted as a collision.
    async fn reserve(&self, long_url: &str) -> Result<ShortCode, ResolveError> {
        let keys = &self.settings.key_space;

        for attempt in 0..self.settings.max_attempts {
            let candidate: ShortCode = self.generator.candidate(long_url, attempt).into();
            let forward_key = keys.forward_key(&candidate);

            if self.store.set_if_absent(&forward_key, long_url).await? {
                debug!(code = %candidate, attempt, "Reserved short code");
                return Ok(candidate);
            }

            let holder = self.store.get(&forward_key).await?;
            if holder.as_deref() == Some(long_url) {
                debug!(code = %candidate, attempt, "Short code already held by this URL");
                return Ok(candidate);
            }

            warn!(code = %candidate, attempt, "Short code collision, retrying");
        }

        warn!(
            url = long_url,
            attempts = self.settings.max_attempts,
            "Failed to allocate a unique short code"
        );
        Err(ResolveError::AllocationExhausted {
            attempts: self.settings.max_attempts,
        })
    }

    /// Writes the reverse mapping for a freshly reserved code.
    ///
    /// A failed write is not fatal: the forward mapping is already in place,
    /// so the code resolves. Returns the code callers should see, which is
    /// another caller's code if it won the reverse key first.
    async fn link(&self, long_url: &str, code: ShortCode) -> ShortCode {
        let reverse_key = self.settings.key_space.reverse_key(long_url);

        let written = match self.settings.reverse_link {
            ReverseLink::Overwrite => self
                .store
                .set(&reverse_key, code.as_str())
                .await
                .map(|()| None),
            ReverseLink::FirstWins => self.claim_reverse(&reverse_key, &code).await,
        };

        match written {
            Ok(Some(winner)) if winner != code => {
                debug!(code = %code, winner = %winner, "Adopting concurrently linked code");
                winner
            }
            Ok(_) => {
                trace!(code = %code, "Linked URL to short code");
                code
            }
            Err(e) => {
                warn!(
                    code = %code,
                    error = %e,
                    "Failed to write reverse mapping; the code still resolves"
                );
                code
            }
        }
    }

    /// Claims `reverse_key` for `code` unless another code holds it.
    ///
    /// Returns the holder's code when the key was taken. A blank value left
    /// in the key is replaced.
    async fn claim_reverse(
        &self,
        reverse_key: &str,
        code: &ShortCode,
    ) -> Result<Option<ShortCode>, StoreError> {
        if self.store.set_if_absent(reverse_key, code.as_str()).await? {
            return Ok(None);
        }

        match stored_code(reverse_key, self.store.get(reverse_key).await?)? {
            Some(holder) => Ok(Some(holder)),
            None => self.store.set(reverse_key, code.as_str()).await.map(|()| None),
        }
    }
}

/// Parses a code read back from a reverse mapping. An empty value counts as
/// absent; anything else that is not a valid code is corrupt data.
fn stored_code(key: &str, value: Option<String>) -> Result<Option<ShortCode>, StoreError> {
    match value {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => ShortCode::new(value)
            .map(Some)
            .map_err(|e| StoreError::InvalidData(format!("{key}: {e}"))),
    }
}

#[async_trait]
impl<S: KvStore, G: Generator> Resolver for ResolverService<S, G> {
    async fn resolve(&self, long_url: &str) -> Result<ShortCode, ResolveError> {
        Self::validate_url(long_url)?;

        let reverse_key = self.settings.key_space.reverse_key(long_url);
        let existing = self.store.get(&reverse_key).await?;
        if let Some(existing) = stored_code(&reverse_key, existing)? {
            debug!(code = %existing, "URL already shortened");
            return Ok(existing);
        }

        let code = self.reserve(long_url).await?;
        Ok(self.link(long_url, code).await)
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<String>, ResolveError> {
        trace!(code = %code, "Looking up short code");

        let forward_key = self.settings.key_space.forward_key(code);
        Ok(self.store.get(&forward_key).await?)
    }
}
