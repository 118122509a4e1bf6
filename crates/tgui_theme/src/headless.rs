//! Headless host implementations
//!
//! In-process stand-ins for the Telegram bridge and the system media query,
//! for embeddings without a browser and for tests. Both keep call counters so
//! listener lifecycles can be asserted.

use std::cell::{Cell, RefCell};

use rustc_hash::FxHashMap;

use crate::appearance::Appearance;
use crate::host::{
    ColorSchemeQuery, HostThemeBridge, ListenerId, SchemeChangeHandler, ThemeChangedHandler,
};

/// Listener registry firing in registration order
struct ListenerRegistry<H: Clone> {
    next_id: Cell<u64>,
    handlers: RefCell<FxHashMap<ListenerId, H>>,
    added: Cell<usize>,
    removed: Cell<usize>,
}

impl<H: Clone> ListenerRegistry<H> {
    fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            handlers: RefCell::new(FxHashMap::default()),
            added: Cell::new(0),
            removed: Cell::new(0),
        }
    }

    fn add(&self, handler: H) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().insert(id, handler);
        self.added.set(self.added.get() + 1);
        id
    }

    fn remove(&self, id: ListenerId) {
        self.removed.set(self.removed.get() + 1);
        self.handlers.borrow_mut().remove(&id);
    }

    /// Snapshot the handlers so callbacks may add or remove listeners
    fn snapshot(&self) -> Vec<H> {
        let handlers = self.handlers.borrow();
        let mut entries: Vec<_> = handlers.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, h)| h.clone()).collect()
    }

    fn len(&self) -> usize {
        self.handlers.borrow().len()
    }
}

/// In-process Telegram theme bridge
pub struct HeadlessHostBridge {
    scheme: Cell<Option<Appearance>>,
    listeners: ListenerRegistry<ThemeChangedHandler>,
}

impl HeadlessHostBridge {
    pub fn new(scheme: Option<Appearance>) -> Self {
        Self {
            scheme: Cell::new(scheme),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Change the host scheme and emit `themeChanged`
    pub fn set_color_scheme(&self, scheme: Option<Appearance>) {
        self.scheme.set(scheme);
        for handler in self.listeners.snapshot() {
            handler();
        }
    }

    /// Currently attached `themeChanged` listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.listeners.added.get()
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.listeners.removed.get()
    }
}

impl HostThemeBridge for HeadlessHostBridge {
    fn color_scheme(&self) -> Option<Appearance> {
        self.scheme.get()
    }

    fn on_theme_changed(&self, handler: ThemeChangedHandler) -> ListenerId {
        self.listeners.add(handler)
    }

    fn off_theme_changed(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

/// In-process `(prefers-color-scheme: dark)` media query
pub struct HeadlessMediaQuery {
    prefers_dark: Cell<bool>,
    listeners: ListenerRegistry<SchemeChangeHandler>,
}

impl HeadlessMediaQuery {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            prefers_dark: Cell::new(prefers_dark),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Change the system preference; listeners fire only on an actual change
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        if self.prefers_dark.replace(prefers_dark) == prefers_dark {
            return;
        }
        for handler in self.listeners.snapshot() {
            handler(prefers_dark);
        }
    }

    /// Currently attached change listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Total `addEventListener('change')` calls
    pub fn add_calls(&self) -> usize {
        self.listeners.added.get()
    }

    /// Total `removeEventListener('change')` calls
    pub fn remove_calls(&self) -> usize {
        self.listeners.removed.get()
    }
}

impl ColorSchemeQuery for HeadlessMediaQuery {
    fn matches(&self) -> bool {
        self.prefers_dark.get()
    }

    fn add_change_listener(&self, handler: SchemeChangeHandler) -> ListenerId {
        self.listeners.add(handler)
    }

    fn remove_change_listener(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}
