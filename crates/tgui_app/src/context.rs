//! UI context
//!
//! Owns every runtime service for one app instance. Components receive the
//! context (or the [`WidgetContext`] inside it) instead of reaching for
//! globals, so several independent apps can share a thread.

use std::rc::Rc;

use tgui_animation::Scheduler;
use tgui_core::ReactiveGraph;
use tgui_dom::Document;
use tgui_platform::PlatformService;
use tgui_theme::{ThemeEnvironment, ThemeService};
use tgui_widgets::{PortalService, Tappable, TappableConfig, WidgetContext};

use crate::config::AppRootConfig;

pub struct UiContext {
    widgets: WidgetContext,
    theme: Rc<ThemeService>,
    config: AppRootConfig,
}

impl UiContext {
    /// Wire services for `config` against a host environment
    ///
    /// The environment's document, if any, is replaced by the context's own.
    pub fn new(config: AppRootConfig, env: ThemeEnvironment) -> Self {
        let widgets = WidgetContext::new(config.platform);
        let env = env.with_document(widgets.document.clone());
        let theme = ThemeService::with_setup(
            widgets.graph.clone(),
            env,
            config.appearance,
            config.follow_system,
        );

        tracing::debug!(
            "UiContext::new - platform {}, theme {} ({:?})",
            config.platform,
            theme.appearance(),
            theme.mode()
        );
        Self {
            widgets,
            theme,
            config,
        }
    }

    /// Context with no host bridge and no system preference
    pub fn headless(config: AppRootConfig) -> Self {
        Self::new(config, ThemeEnvironment::unavailable())
    }

    pub fn config(&self) -> &AppRootConfig {
        &self.config
    }

    pub fn widgets(&self) -> &WidgetContext {
        &self.widgets
    }

    pub fn graph(&self) -> &Rc<ReactiveGraph> {
        &self.widgets.graph
    }

    pub fn document(&self) -> &Document {
        &self.widgets.document
    }

    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.widgets.scheduler
    }

    pub fn platform(&self) -> &Rc<PlatformService> {
        &self.widgets.platform
    }

    pub fn theme(&self) -> &Rc<ThemeService> {
        &self.theme
    }

    pub fn portal(&self) -> &Rc<PortalService> {
        &self.widgets.portal
    }

    /// A tappable using the app's feedback defaults
    pub fn tappable(&self) -> Tappable {
        self.tappable_with(self.config.tappable_config())
    }

    pub fn tappable_with(&self, config: TappableConfig) -> Tappable {
        Tappable::new(&self.widgets, config)
    }
}
