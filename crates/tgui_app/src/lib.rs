//! tgui Application Root
//!
//! Wires the runtime services together and mounts the app shell.
//!
//! # Example
//!
//! ```rust
//! use tgui_app::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = AppRootConfig::from_toml_str("platform = \"ios\"")?;
//!     let app = AppRoot::mount(UiContext::headless(config))?;
//!
//!     assert!(app.context().platform().is_ios());
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod error;
mod root;


pub use config::AppRootConfig;
pub use context::UiContext;
pub use error::{AppError, Result};
pub use root::AppRoot;

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::AppRootConfig;
    pub use crate::context::UiContext;
    pub use crate::error::{AppError, Result};
    pub use crate::root::AppRoot;

    // Services
    pub use tgui_platform::{Platform, PlatformService};
    pub use tgui_theme::{Appearance, ThemeEnvironment, ThemeMode, ThemeService};
    pub use tgui_widgets::portal::from_fn;
    pub use tgui_widgets::{
        InteractiveAnimation, PortalOutlet, Tappable, TappableConfig, WidgetContext,
    };

    // Core types
    pub use tgui_core::{PointerEvent, PointerType, Rect};
    pub use tgui_dom::{Document, NodeId};
}
