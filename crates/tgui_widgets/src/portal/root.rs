use std::rc::Rc;

use tgui_dom::{Document, NodeId, Result};

use super::service::PortalService;
use crate::context::WidgetContext;

/// Owner of the portal container
///
/// Creates `div.tgui-portal-root` under its parent and registers it once the
/// node is attached. Unmounting clears the registration before the node goes
/// away, so outlets tear their projections down first.
pub struct RootPortal {
    document: Document,
    portal: Rc<PortalService>,
    container: Option<NodeId>,
}

impl RootPortal {
    pub const CLASS: &'static str = "tgui-portal-root";

    pub fn mount(ctx: &WidgetContext, parent: NodeId) -> Result<Self> {
        let document = ctx.document.clone();
        let container = document.create_element("div");
        let attached = document
            .add_class(container, Self::CLASS)
            .and_then(|_| document.append_child(parent, container));
        if let Err(err) = attached {
            document.remove_node(container);
            return Err(err);
        }

        ctx.portal.set_portal_container(container);
        Ok(Self {
            document,
            portal: ctx.portal.clone(),
            container: Some(container),
        })
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn unmount(&mut self) {
        let Some(container) = self.container.take() else {
            return;
        };
        // Another root may have taken over the slot
        if self.portal.portal_container_untracked() == Some(container) {
            self.portal.clear_portal_container();
        }
        self.document.remove_node(container);
    }
}

impl Drop for RootPortal {
    fn drop(&mut self) {
        self.unmount();
    }
}
