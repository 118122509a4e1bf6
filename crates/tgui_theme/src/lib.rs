//! tgui Theme System
//!
//! Resolves the light/dark [`Appearance`] of the UI and reflects it on the
//! document root as a single `theme-light` / `theme-dark` class.
//!
//! # Sources
//!
//! The appearance follows exactly one source at a time:
//!
//! - **Host**: the Telegram WebApp bridge reports its color scheme and emits
//!   `themeChanged` events ([`HostThemeBridge`])
//! - **System**: the `prefers-color-scheme: dark` media query
//!   ([`ColorSchemeQuery`])
//! - **Manual**: an explicit [`ThemeService::set_theme`] call
//!
//! At construction the service follows the host when one is present, else the
//! system preference, else it settles on light. Switching sources always
//! detaches the previous listener before attaching the next one.
//!
//! # Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use tgui_core::ReactiveGraph;
//! use tgui_dom::Document;
//! use tgui_theme::headless::HeadlessMediaQuery;
//! use tgui_theme::{Appearance, ThemeEnvironment, ThemeService};
//!
//! let graph = Rc::new(ReactiveGraph::new());
//! let document = Document::new();
//! let system = Rc::new(HeadlessMediaQuery::new(true));
//! let env = ThemeEnvironment::unavailable()
//!     .with_system(system)
//!     .with_document(document.clone());
//!
//! let theme = ThemeService::new(graph, env);
//! assert_eq!(theme.appearance(), Appearance::Dark);
//! assert!(document.has_class(document.document_element(), "theme-dark"));
//! ```

pub mod appearance;
pub mod error;
pub mod headless;
pub mod host;
pub mod service;

pub use appearance::Appearance;
pub use error::{Result, ThemeError};
pub use host::{
    ColorSchemeQuery, HostThemeBridge, ListenerId, SchemeChangeHandler, ThemeChangedHandler,
    ThemeEnvironment,
};
pub use service::{ThemeMode, ThemeService, GLOBAL_STYLES_ID};
