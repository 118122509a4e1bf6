//! Host environment interfaces
//!
//! The theme service never talks to a browser directly. Everything it
//! consumes from the environment goes through these traits, and every piece is
//! optional: a non-browser embedding passes [`ThemeEnvironment::unavailable`].

use std::rc::Rc;

use tgui_dom::Document;

use crate::appearance::Appearance;

/// Handle returned when registering a listener, used to remove it again
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Called when the host reports a theme change; the new scheme is read back
/// from [`HostThemeBridge::color_scheme`]
pub type ThemeChangedHandler = Rc<dyn Fn()>;

/// Called with the new `prefers-color-scheme: dark` match result
pub type SchemeChangeHandler = Rc<dyn Fn(bool)>;

/// The Telegram WebApp theme bridge (`colorScheme`, `onEvent('themeChanged')`)
pub trait HostThemeBridge {
    /// Current host color scheme, `None` if the host does not report one
    fn color_scheme(&self) -> Option<Appearance>;

    fn on_theme_changed(&self, handler: ThemeChangedHandler) -> ListenerId;

    /// Removing an unknown id is a no-op
    fn off_theme_changed(&self, id: ListenerId);
}

/// The `(prefers-color-scheme: dark)` media query
pub trait ColorSchemeQuery {
    /// Whether the system currently prefers dark
    fn matches(&self) -> bool;

    fn add_change_listener(&self, handler: SchemeChangeHandler) -> ListenerId;

    /// Removing an unknown id is a no-op
    fn remove_change_listener(&self, id: ListenerId);
}

/// Everything the theme service may consume from its environment
#[derive(Clone, Default)]
pub struct ThemeEnvironment {
    pub host: Option<Rc<dyn HostThemeBridge>>,
    pub system: Option<Rc<dyn ColorSchemeQuery>>,
    pub document: Option<Document>,
}

impl ThemeEnvironment {
    /// No host bridge, no media query, no document
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: Rc<dyn HostThemeBridge>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_system(mut self, system: Rc<dyn ColorSchemeQuery>) -> Self {
        self.system = Some(system);
        self
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }
}

impl std::fmt::Debug for ThemeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEnvironment")
            .field("host", &self.host.is_some())
            .field("system", &self.system.is_some())
            .field("document", &self.document.is_some())
            .finish()
    }
}
