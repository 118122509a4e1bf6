//! tgui Widget Infrastructure
//!
//! The interactive and structural pieces presentational components build on:
//!
//! - [`portal`]: render content into a root-level container registered by
//!   [`RootPortal`], relayed by [`PortalOutlet`]
//! - [`ripple`]: per-pointer touch feedback waves with timed retirement
//! - [`tappable`]: the pressable wrapper used by buttons, cells and chips
//!
//! Widgets receive their shared services through a [`WidgetContext`].

pub mod context;
pub mod portal;
pub mod ripple;
pub mod tappable;

pub use context::WidgetContext;
pub use portal::{ContentKey, EmbeddedView, PortalOutlet, PortalService, RootPortal, Template};
pub use ripple::{Ripple, RippleTracker, RippleWave, WAVE_LIFETIME};
pub use tappable::{InteractiveAnimation, Tappable, TappableConfig};
