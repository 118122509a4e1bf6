use std::rc::Rc;

use tgui_core::reactive::{ReactiveGraph, Signal};
use tgui_dom::NodeId;

/// The single, process-wide portal container slot
pub struct PortalService {
    graph: Rc<ReactiveGraph>,
    container: Signal<Option<NodeId>>,
}

impl PortalService {
    pub fn new(graph: Rc<ReactiveGraph>) -> Self {
        let container = graph.create_signal(None);
        Self { graph, container }
    }

    /// Register or replace the container; every outlet re-evaluates
    pub fn set_portal_container(&self, container: NodeId) {
        tracing::debug!("PortalService::set_portal_container - {:?}", container);
        self.graph.set(self.container, Some(container));
    }

    /// Unset the container; projections are deferred until the next registration
    pub fn clear_portal_container(&self) {
        tracing::debug!("PortalService::clear_portal_container");
        self.graph.set(self.container, None);
    }

    /// Current container (reactive)
    pub fn portal_container(&self) -> Option<NodeId> {
        self.graph.get(self.container).flatten()
    }

    pub fn portal_container_untracked(&self) -> Option<NodeId> {
        self.graph.get_untracked(self.container).flatten()
    }

    /// Signal handle for subscribing from other graph nodes
    pub fn container_signal(&self) -> Signal<Option<NodeId>> {
        self.container
    }
}
