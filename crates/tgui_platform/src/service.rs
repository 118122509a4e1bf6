//! Reactive platform service

use std::rc::Rc;

use tgui_core::reactive::{Derived, ReactiveGraph, Signal};

use crate::platform::Platform;

/// Holds the current platform flavor
///
/// Reads are reactive: an effect or derived value that calls
/// [`PlatformService::platform`] or [`PlatformService::is_ios`] re-runs after
/// [`PlatformService::set_platform`].
pub struct PlatformService {
    graph: Rc<ReactiveGraph>,
    platform: Signal<Platform>,
    is_ios: Derived<bool>,
}

impl PlatformService {
    pub fn new(graph: Rc<ReactiveGraph>, initial: Platform) -> Self {
        let platform = graph.create_signal(initial);
        let is_ios = graph.create_derived(move |g| g.get(platform).unwrap_or_default().is_ios());
        Self {
            graph,
            platform,
            is_ios,
        }
    }

    /// Overwrite the current platform
    pub fn set_platform(&self, platform: Platform) {
        tracing::debug!("PlatformService::set_platform - {}", platform);
        self.graph.set(self.platform, platform);
    }

    pub fn platform(&self) -> Platform {
        self.graph.get(self.platform).unwrap_or_default()
    }

    pub fn is_ios(&self) -> bool {
        self.graph.get_derived(self.is_ios).unwrap_or(false)
    }

    /// Signal handle for subscribing from other graph nodes
    pub fn platform_signal(&self) -> Signal<Platform> {
        self.platform
    }

    pub fn graph(&self) -> &Rc<ReactiveGraph> {
        &self.graph
    }
}
