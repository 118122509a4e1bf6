//! Theme error types

use thiserror::Error;

/// Theme-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// The name is not a supported appearance
    #[error("Unknown appearance: {0:?} (expected \"light\" or \"dark\")")]
    UnknownAppearance(String),
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
