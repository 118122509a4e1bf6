//! App shell
//!
//! [`AppRoot`] mounts `div.tgui-root` into the document body, keeps its
//! platform classes in sync with the platform service, and hosts the
//! [`RootPortal`] overlays render into.

use tgui_core::reactive::Effect;
use tgui_dom::NodeId;
use tgui_widgets::RootPortal;

use crate::context::UiContext;
use crate::error::Result;

pub struct AppRoot {
    ctx: UiContext,
    root: Option<NodeId>,
    portal: Option<RootPortal>,
    effect: Option<Effect>,
}

impl AppRoot {
    pub const CLASS: &'static str = "tgui-root";
    pub const IOS_CLASS: &'static str = "tgui-root--ios";
    pub const BASE_CLASS: &'static str = "tgui-root--base";

    pub fn mount(ctx: UiContext) -> Result<Self> {
        let document = ctx.document().clone();
        let root = document.create_element("div");
        let attached = document
            .add_class(root, Self::CLASS)
            .and_then(|_| document.append_child(document.body(), root));
        if let Err(err) = attached {
            document.remove_node(root);
            return Err(err.into());
        }

        let effect = {
            let document = document.clone();
            let platform = ctx.platform().platform_signal();
            ctx.graph().create_effect(move |g| {
                let ios = g.get(platform).is_some_and(|p| p.is_ios());
                let synced = document
                    .toggle_class(root, AppRoot::IOS_CLASS, ios)
                    .and_then(|_| document.toggle_class(root, AppRoot::BASE_CLASS, !ios));
                if let Err(err) = synced {
                    tracing::warn!("AppRoot platform class sync failed: {}", err);
                }
            })
        };

        let portal = match RootPortal::mount(ctx.widgets(), root) {
            Ok(portal) => portal,
            Err(err) => {
                ctx.graph().dispose_effect(effect);
                document.remove_node(root);
                return Err(err.into());
            }
        };

        tracing::debug!("AppRoot mounted at {:?}", root);
        Ok(Self {
            ctx,
            root: Some(root),
            portal: Some(portal),
            effect: Some(effect),
        })
    }

    pub fn context(&self) -> &UiContext {
        &self.ctx
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn portal_container(&self) -> Option<NodeId> {
        self.portal.as_ref().and_then(|portal| portal.container())
    }

    pub fn unmount(&mut self) {
        // Overlays go first, then the shell
        if let Some(mut portal) = self.portal.take() {
            portal.unmount();
        }
        if let Some(effect) = self.effect.take() {
            self.ctx.graph().dispose_effect(effect);
        }
        if let Some(root) = self.root.take() {
            self.ctx.document().remove_node(root);
            tracing::debug!("AppRoot unmounted");
        }
    }
}

impl Drop for AppRoot {
    fn drop(&mut self) {
        self.unmount();
    }
}
