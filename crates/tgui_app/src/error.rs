//! Application error types

use thiserror::Error;
use tgui_dom::DomError;

/// Errors surfaced while configuring or mounting an app
#[derive(Error, Debug)]
pub enum AppError {
    /// The configuration text is not valid TOML for [`crate::AppRootConfig`]
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Mounting the app shell into the document failed
    #[error("Document error: {0}")]
    Dom(#[from] DomError),
}

/// Result type for app operations
pub type Result<T> = std::result::Result<T, AppError>;
