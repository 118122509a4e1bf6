//! Portals
//!
//! Overlays (modals, popovers, snackbars) render into a single root-level
//! container instead of their logical position in the tree:
//!
//! - [`RootPortal`] creates the container under the app root and registers
//!   it with the [`PortalService`] once mounted
//! - [`PortalOutlet`] watches the registration and relays its templates into
//!   the container, reparenting the rendered nodes
//!
//! Registration and template readiness may happen in either order; nothing is
//! rendered until both are present.
//!
//! ```rust
//! use tgui_platform::Platform;
//! use tgui_widgets::portal::from_fn;
//! use tgui_widgets::{PortalOutlet, RootPortal, WidgetContext};
//!
//! let ctx = WidgetContext::new(Platform::Base);
//! let outlet = PortalOutlet::new(&ctx);
//! outlet.project(from_fn(|doc| Ok(vec![doc.create_text("hi")])));
//!
//! // Nothing rendered until the root portal mounts
//! assert!(outlet.projected_nodes().is_empty());
//!
//! let root = RootPortal::mount(&ctx, ctx.document.body()).unwrap();
//! assert_eq!(outlet.projected_nodes().len(), 1);
//! # drop(root);
//! ```

mod outlet;
mod root;
mod service;
mod template;

pub use outlet::{ContentKey, PortalOutlet};
pub use root::RootPortal;
pub use service::PortalService;
pub use template::{from_fn, EmbeddedView, Template};
