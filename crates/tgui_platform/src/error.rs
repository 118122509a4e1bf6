//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The name is not one of the supported platform flavors
    #[error("Unknown platform: {0:?} (expected \"ios\" or \"base\")")]
    UnknownPlatform(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
