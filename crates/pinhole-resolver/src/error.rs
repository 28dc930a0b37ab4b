use thiserror::Error;

/// Errors detected while validating [`ResolverSettings`](crate::ResolverSettings).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}
