use crate::error::Error;
use crate::Generator;
use pinhole_core::ShortCode;
use sha2::{Digest, Sha256};
use typed_builder::TypedBuilder;

const DEFAULT_DIGEST_BYTES: usize = 6;
const MAX_DIGEST_BYTES: usize = std::mem::size_of::<u64>();

/// Configures a [`HashGenerator`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct HashGeneratorSettings {
    /// How many leading digest bytes make up the code value, in `[1, 8]`.
    ///
    /// Six bytes (48 bits) encode to at most nine base-62 symbols. Narrower
    /// widths give shorter codes at the cost of more collisions.
    #[builder(default = DEFAULT_DIGEST_BYTES)]
    pub digest_bytes: usize,
}

impl Default for HashGeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Deterministic candidate generator based on SHA-256.
///
/// The candidate for `(long_url, attempt)` is the SHA-256 digest of
/// `"<long_url>:<attempt>"`, truncated to its leading `digest_bytes` bytes,
/// read as a big-endian integer and encoded in base 62. No counter or
/// shared sequence is involved, so any node computes the same candidates.
#[derive(Debug, Clone, Copy)]
pub struct HashGenerator {
    digest_bytes: usize,
}

impl HashGenerator {
    /// Creates a generator, rejecting digest widths outside `[1, 8]`.
    pub fn new(settings: HashGeneratorSettings) -> Result<Self, Error> {
        if settings.digest_bytes == 0 || settings.digest_bytes > MAX_DIGEST_BYTES {
            return Err(Error::InvalidDigestWidth {
                digest_bytes: settings.digest_bytes,
                max_digest_bytes: MAX_DIGEST_BYTES,
            });
        }

        Ok(Self {
            digest_bytes: settings.digest_bytes,
        })
    }

    pub fn digest_bytes(&self) -> usize {
        self.digest_bytes
    }

    /// Returns the truncated digest value for `(long_url, attempt)`.
    pub fn value(&self, long_url: &str, attempt: u32) -> u64 {
        let digest = Sha256::new()
            .chain_update(long_url.as_bytes())
            .chain_update(b":")
            .chain_update(attempt.to_string().as_bytes())
            .finalize();

        let mut raw = [0_u8; MAX_DIGEST_BYTES];
        raw[MAX_DIGEST_BYTES - self.digest_bytes..].copy_from_slice(&digest[..self.digest_bytes]);
        u64::from_be_bytes(raw)
    }
}

impl Default for HashGenerator {
    fn default() -> Self {
        Self {
            digest_bytes: DEFAULT_DIGEST_BYTES,
        }
    }
}

impl Generator for HashGenerator {
    type Output = ShortCode;

    fn candidate(&self, long_url: &str, attempt: u32) -> Self::Output {
        ShortCode::from_value(self.value(long_url, attempt))
    }
}
