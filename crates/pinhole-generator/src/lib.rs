pub mod error;
pub mod hash;

pub use error::Error;
pub use hash::{HashGenerator, HashGeneratorSettings};

use pinhole_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure functions of their input: they never touch the
/// store, and the same `(long_url, attempt)` pair must always yield the same
/// candidate. Uniqueness is not their concern; the resolver settles it by
/// reserving candidates atomically and asking for the next attempt on
/// collision.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates the candidate code for the given URL and attempt number.
    ///
    /// Different attempt numbers should yield different candidates so a
    /// retry after a collision makes progress.
    fn candidate(&self, long_url: &str, attempt: u32) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::Generator;
    use crate::HashGenerator;
    use pinhole_core::ShortCode;

    #[test]
    fn hash_generator_implements_generator_trait() {
        fn candidates<G: Generator>(generator: &G, url: &str) -> Vec<ShortCode> {
            (0..3).map(|attempt| generator.candidate(url, attempt).into()).collect()
        }

        let codes = candidates(&HashGenerator::default(), "https://example.com");

        assert_eq!(codes[0].as_str(), "coT4rw13");
        assert_eq!(codes[1].as_str(), "xxnH7mKK");
        assert_eq!(codes[2].as_str(), "boYfDI7E8");
    }
}
