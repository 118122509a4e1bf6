//! Shared services handed to widgets

use std::rc::Rc;

use tgui_animation::Scheduler;
use tgui_core::ReactiveGraph;
use tgui_dom::Document;
use tgui_platform::{Platform, PlatformService};

use crate::portal::PortalService;

/// Services a widget may read; cloning shares them
#[derive(Clone)]
pub struct WidgetContext {
    pub graph: Rc<ReactiveGraph>,
    pub scheduler: Rc<Scheduler>,
    pub document: Document,
    pub platform: Rc<PlatformService>,
    pub portal: Rc<PortalService>,
}

impl WidgetContext {
    /// Fresh services over a new document
    pub fn new(platform: Platform) -> Self {
        let graph = Rc::new(ReactiveGraph::new());
        Self {
            scheduler: Rc::new(Scheduler::new()),
            document: Document::new(),
            platform: Rc::new(PlatformService::new(graph.clone(), platform)),
            portal: Rc::new(PortalService::new(graph.clone())),
            graph,
        }
    }
}
