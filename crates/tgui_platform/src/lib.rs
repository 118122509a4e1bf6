//! tgui Platform
//!
//! Components render one of two flavors: `ios` (Apple-style markup, opacity
//! press feedback) or `base` (Material-style markup, ripple feedback). This
//! crate holds that identity:
//!
//! - [`Platform`]: the two-valued flavor, with detection from the Telegram
//!   host platform name or a user agent
//! - [`PlatformService`]: the reactive, process-wide current platform
//!
//! ```rust
//! use std::rc::Rc;
//! use tgui_core::ReactiveGraph;
//! use tgui_platform::{Platform, PlatformService};
//!
//! let graph = Rc::new(ReactiveGraph::new());
//! let platform = PlatformService::new(graph, Platform::Base);
//! platform.set_platform(Platform::from_host_platform("ios"));
//! assert!(platform.is_ios());
//! ```

pub mod error;
pub mod platform;
pub mod service;

pub use error::{PlatformError, Result};
pub use platform::Platform;
pub use service::PlatformService;
