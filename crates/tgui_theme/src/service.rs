//! Theme service
//!
//! A four-state machine over the appearance source:
//!
//! ```text
//!                 host reports a scheme
//! Uninitialized ───────────────────────▶ FollowingHost
//!       │        no host, media query
//!       ├──────────────────────────────▶ FollowingSystem ◀── setup_theme(_, true)
//!       │        nothing available                           set_theme(_, true)
//!       └──────────────────────────────▶ Manual(light)   ◀── set_theme(_, false)
//! ```
//!
//! Every transition detaches the current listener, attaches the next one (if
//! any) and applies the resolved appearance to the document right away.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tgui_core::reactive::{ReactiveGraph, Signal};

use crate::appearance::Appearance;
use crate::host::{ListenerId, ThemeEnvironment};

/// `id` of the injected global stylesheet
pub const GLOBAL_STYLES_ID: &str = "tgui-global-styles";

const GLOBAL_STYLES: &str = "\
:root.theme-light{color-scheme:light}\
:root.theme-dark{color-scheme:dark}\
body{margin:0;-webkit-tap-highlight-color:transparent}";

/// Which source the appearance currently follows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Uninitialized,
    FollowingHost,
    FollowingSystem,
    Manual,
}

#[derive(Default)]
struct Subscriptions {
    host: Option<ListenerId>,
    system: Option<ListenerId>,
}

/// Resolves the light/dark appearance and keeps the document root in sync
pub struct ThemeService {
    graph: Rc<ReactiveGraph>,
    env: ThemeEnvironment,
    appearance: Signal<Appearance>,
    mode: Cell<ThemeMode>,
    /// Appearance currently reflected on the document root
    applied: Cell<Option<Appearance>>,
    subscriptions: RefCell<Subscriptions>,
    this: Weak<ThemeService>,
}

impl ThemeService {
    /// Create the service and resolve the initial appearance
    ///
    /// Never fails: a missing environment resolves to light.
    pub fn new(graph: Rc<ReactiveGraph>, env: ThemeEnvironment) -> Rc<Self> {
        Self::with_setup(graph, env, None, false)
    }

    /// Create the service with an initial source already chosen
    ///
    /// Takes the same arguments as [`ThemeService::setup_theme`]. Only the
    /// chosen source is subscribed and only the resulting theme is applied.
    pub fn with_setup(
        graph: Rc<ReactiveGraph>,
        env: ThemeEnvironment,
        appearance: Option<Appearance>,
        follow_system: bool,
    ) -> Rc<Self> {
        let signal = graph.create_signal(Appearance::default());
        let service = Rc::new_cyclic(|this| Self {
            graph,
            env,
            appearance: signal,
            mode: Cell::new(ThemeMode::Uninitialized),
            applied: Cell::new(None),
            subscriptions: RefCell::new(Subscriptions::default()),
            this: this.clone(),
        });

        service.load_global_styles();
        match (appearance, follow_system) {
            (_, true) => service.follow_system(),
            (Some(theme), false) => service.set_theme(theme, false),
            (None, false) => service.resolve_initial(),
        }
        service
    }

    fn resolve_initial(&self) {
        if self.follow_host() {
            return;
        }
        if self.env.system.is_some() {
            self.follow_system();
            return;
        }

        tracing::debug!("ThemeService - no host bridge or media query, falling back to light");
        self.detach_listeners();
        self.mode.set(ThemeMode::Manual);
        self.commit(Appearance::Light);
    }

    // ========== Public API ==========

    /// Current appearance (reactive)
    pub fn appearance(&self) -> Appearance {
        self.graph.get(self.appearance).unwrap_or_default()
    }

    /// Signal handle for subscribing from other graph nodes
    pub fn appearance_signal(&self) -> Signal<Appearance> {
        self.appearance
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    pub fn follows_system(&self) -> bool {
        self.mode.get() == ThemeMode::FollowingSystem
    }

    /// Appearance currently reflected on the document root
    pub fn applied_theme(&self) -> Option<Appearance> {
        self.applied.get()
    }

    /// Set the appearance manually, or switch to following the system
    ///
    /// With `follow_system` the `theme` argument is ignored: the system
    /// preference decides.
    pub fn set_theme(&self, theme: Appearance, follow_system: bool) {
        if follow_system {
            self.follow_system();
            return;
        }

        tracing::debug!("ThemeService::set_theme - manual {}", theme);
        self.detach_listeners();
        self.mode.set(ThemeMode::Manual);
        self.commit(theme);
    }

    /// (Re)configure the theme source
    ///
    /// - `follow_system`: follow the system preference
    /// - `Some(appearance)`: manual appearance
    /// - `None`: resolve again the way construction does (host, else system)
    pub fn setup_theme(&self, appearance: Option<Appearance>, follow_system: bool) {
        match (appearance, follow_system) {
            (_, true) => self.follow_system(),
            (Some(theme), false) => self.set_theme(theme, false),
            (None, false) => {
                if !self.follow_host() {
                    self.follow_system();
                }
            }
        }
    }

    /// Switch manually to the opposite appearance
    pub fn toggle(&self) {
        self.set_theme(self.appearance().toggle(), false);
    }

    /// Reflect `theme` on the document root
    ///
    /// Returns false without touching the document when `theme` is already
    /// applied or there is no document.
    pub fn apply_theme_to_dom(&self, theme: Appearance) -> bool {
        if self.applied.get() == Some(theme) {
            return false;
        }
        let Some(document) = &self.env.document else {
            return false;
        };

        let root = document.document_element();
        for stale in Appearance::ALL.into_iter().filter(|a| *a != theme) {
            if let Err(err) = document.remove_class(root, stale.class_name()) {
                tracing::warn!("ThemeService - failed to remove {}: {}", stale.class_name(), err);
            }
        }
        if let Err(err) = document.add_class(root, theme.class_name()) {
            tracing::warn!("ThemeService - failed to apply {}: {}", theme.class_name(), err);
            return false;
        }

        self.applied.set(Some(theme));
        true
    }

    /// Inject the global stylesheet into the document head once
    ///
    /// Returns whether a stylesheet was injected by this call.
    pub fn load_global_styles(&self) -> bool {
        let Some(document) = &self.env.document else {
            return false;
        };
        if document.get_element_by_id(GLOBAL_STYLES_ID).is_some() {
            return false;
        }

        let style = document.create_element("style");
        let injected = document
            .set_id(style, GLOBAL_STYLES_ID)
            .and_then(|_| document.append_child(style, document.create_text(GLOBAL_STYLES)))
            .and_then(|_| document.append_child(document.head(), style));
        match injected {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("ThemeService - failed to inject global styles: {}", err);
                document.remove_node(style);
                false
            }
        }
    }

    /// Detach every listener; the current appearance stays applied
    pub fn destroy(&self) {
        self.detach_listeners();
    }

    // ========== Transitions ==========

    /// Follow the host bridge; returns false if it is absent or reports no scheme
    fn follow_host(&self) -> bool {
        let Some(host) = self.env.host.clone() else {
            return false;
        };
        let Some(scheme) = host.color_scheme() else {
            return false;
        };

        self.detach_listeners();
        let this = self.this.clone();
        let id = host.on_theme_changed(Rc::new(move || {
            if let Some(service) = this.upgrade() {
                service.on_host_theme_changed();
            }
        }));
        self.subscriptions.borrow_mut().host = Some(id);

        tracing::debug!("ThemeService - following host ({})", scheme);
        self.mode.set(ThemeMode::FollowingHost);
        self.commit(scheme);
        true
    }

    fn follow_system(&self) {
        self.detach_listeners();
        self.mode.set(ThemeMode::FollowingSystem);

        let Some(system) = self.env.system.clone() else {
            tracing::debug!("ThemeService - no media query, following system as light");
            self.commit(Appearance::Light);
            return;
        };

        let this = self.this.clone();
        let id = system.add_change_listener(Rc::new(move |prefers_dark| {
            if let Some(service) = this.upgrade() {
                service.on_system_changed(prefers_dark);
            }
        }));
        self.subscriptions.borrow_mut().system = Some(id);

        let scheme = Appearance::from_dark(system.matches());
        tracing::debug!("ThemeService - following system ({})", scheme);
        self.commit(scheme);
    }

    fn on_host_theme_changed(&self) {
        if self.mode.get() != ThemeMode::FollowingHost {
            return;
        }
        if let Some(scheme) = self.env.host.as_ref().and_then(|host| host.color_scheme()) {
            self.commit(scheme);
        }
    }

    fn on_system_changed(&self, prefers_dark: bool) {
        if self.mode.get() != ThemeMode::FollowingSystem {
            return;
        }
        self.commit(Appearance::from_dark(prefers_dark));
    }

    fn detach_listeners(&self) {
        let (host_id, system_id) = {
            let mut subscriptions = self.subscriptions.borrow_mut();
            (subscriptions.host.take(), subscriptions.system.take())
        };

        if let (Some(id), Some(host)) = (host_id, self.env.host.as_ref()) {
            host.off_theme_changed(id);
        }
        if let (Some(id), Some(system)) = (system_id, self.env.system.as_ref()) {
            system.remove_change_listener(id);
        }
    }

    fn commit(&self, theme: Appearance) {
        if self.graph.get_untracked(self.appearance) != Some(theme) {
            self.graph.set(self.appearance, theme);
        }
        self.apply_theme_to_dom(theme);
    }
}

impl Drop for ThemeService {
    fn drop(&mut self) {
        self.detach_listeners();
    }
}
