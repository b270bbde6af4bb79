//! Error types for configuration handling.

use thiserror::Error;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layered configuration could not be built or deserialized
    #[error("Configuration error: {0}")]
    Load(String),

    /// Settings were loaded but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
