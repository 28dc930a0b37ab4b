use thiserror::Error;

/// Errors returned by generator construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid digest width {digest_bytes}; expected 1..={max_digest_bytes} bytes")]
    InvalidDigestWidth {
        digest_bytes: usize,
        max_digest_bytes: usize,
    },
}
