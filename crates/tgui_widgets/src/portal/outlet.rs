use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tgui_core::reactive::{Effect, ReactiveGraph, Signal};
use tgui_dom::{Document, DomError, NodeId};

use super::template::{EmbeddedView, Template};
use crate::context::WidgetContext;

/// Handle to one template queued on an outlet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey(u64);

#[derive(Clone)]
struct PortalContent {
    key: ContentKey,
    template: Rc<dyn Template>,
}

/// Relays templates into the registered portal container
///
/// The outlet re-evaluates whenever the container registration or its own
/// template list changes. Every evaluation first destroys the views it created
/// last time, then, if a container is registered, instantiates each template
/// in order and appends the roots to the container. With no container the
/// templates stay queued and nothing touches the document.
pub struct PortalOutlet {
    graph: Rc<ReactiveGraph>,
    document: Document,
    contents: Signal<Vec<PortalContent>>,
    views: Rc<RefCell<Vec<EmbeddedView>>>,
    next_key: Cell<u64>,
    effect: Cell<Option<Effect>>,
}

impl PortalOutlet {
    pub fn new(ctx: &WidgetContext) -> Self {
        let graph = ctx.graph.clone();
        let document = ctx.document.clone();
        let contents = graph.create_signal(Vec::<PortalContent>::new());
        let views = Rc::new(RefCell::new(Vec::new()));

        let effect = {
            let document = document.clone();
            let views = views.clone();
            let container = ctx.portal.container_signal();
            graph.create_effect(move |g| {
                let container = g.get(container).flatten();
                let contents = g.get(contents).unwrap_or_default();
                relay(&document, &views, container, &contents);
            })
        };

        Self {
            graph,
            document,
            contents,
            views,
            next_key: Cell::new(0),
            effect: Cell::new(Some(effect)),
        }
    }

    /// Queue a template; rendered as soon as a container is registered
    pub fn project(&self, template: Rc<dyn Template>) -> ContentKey {
        let key = self.allocate_key();
        self.graph.update(self.contents, |contents| {
            contents.push(PortalContent { key, template });
        });
        key
    }

    /// Replace every queued template with a single one
    pub fn set_template(&self, template: Rc<dyn Template>) -> ContentKey {
        let key = self.allocate_key();
        self.graph
            .set(self.contents, vec![PortalContent { key, template }]);
        key
    }

    /// Drop a queued template; its rendered view goes with it
    pub fn remove(&self, key: ContentKey) -> bool {
        let present = self
            .graph
            .get_untracked(self.contents)
            .is_some_and(|contents| contents.iter().any(|content| content.key == key));
        if present {
            self.graph.update(self.contents, |contents| {
                contents.retain(|content| content.key != key);
            });
        }
        present
    }

    pub fn clear_templates(&self) {
        self.graph.set(self.contents, Vec::new());
    }

    pub fn pending_count(&self) -> usize {
        self.graph
            .get_untracked(self.contents)
            .map_or(0, |contents| contents.len())
    }

    /// Root nodes of the views currently rendered into the container
    pub fn projected_nodes(&self) -> Vec<NodeId> {
        self.views
            .borrow()
            .iter()
            .flat_map(|view| view.roots().iter().copied())
            .collect()
    }

    /// Stop relaying and destroy the rendered views
    pub fn destroy(&self) {
        if let Some(effect) = self.effect.take() {
            self.graph.dispose_effect(effect);
            self.graph.dispose_signal(self.contents);
        }
        teardown(&self.document, &self.views);
    }

    fn allocate_key(&self) -> ContentKey {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        ContentKey(key)
    }
}

impl Drop for PortalOutlet {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn teardown(document: &Document, views: &RefCell<Vec<EmbeddedView>>) {
    let previous = std::mem::take(&mut *views.borrow_mut());
    for view in previous {
        view.destroy(document);
    }
}

fn relay(
    document: &Document,
    views: &RefCell<Vec<EmbeddedView>>,
    container: Option<NodeId>,
    contents: &[PortalContent],
) {
    teardown(document, views);

    let Some(container) = container else {
        tracing::trace!("portal outlet deferred: no container registered");
        return;
    };
    if contents.is_empty() {
        return;
    }

    match project_all(document, container, contents) {
        Ok(projected) => *views.borrow_mut() = projected,
        Err(err) => tracing::warn!("portal projection into {:?} failed: {}", container, err),
    }
}

fn project_all(
    document: &Document,
    container: NodeId,
    contents: &[PortalContent],
) -> Result<Vec<EmbeddedView>, DomError> {
    if !document.contains(container) {
        return Err(DomError::NodeNotFound(container));
    }
    if !document.is_connected(container) {
        return Err(DomError::Detached(container));
    }

    let mark = document.creation_mark();
    let mut projected = Vec::with_capacity(contents.len());
    for content in contents {
        let attached = EmbeddedView::create(content.template.as_ref(), document).and_then(|view| {
            let moved = view
                .roots()
                .iter()
                .try_for_each(|root| document.append_child(container, *root));
            projected.push(view);
            moved
        });
        if let Err(err) = attached {
            for view in projected.drain(..) {
                view.destroy(document);
            }
            // Nodes a failing template built but never returned
            document.remove_detached_since(mark);
            return Err(err);
        }
    }
    Ok(projected)
}
