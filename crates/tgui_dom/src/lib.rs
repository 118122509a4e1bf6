//! tgui Headless Document
//!
//! A retained-mode element tree standing in for the browser DOM. It carries
//! exactly what the runtime services touch:
//!
//! - element creation and text nodes
//! - parent/child links with reparenting (`append_child` moves, never copies)
//! - class lists and `id` lookup
//! - attributes (used for inline styles)
//! - a mutation counter, so callers can assert that nothing changed
//!
//! [`Document`] is a cheap handle; clones share the same tree.
//!
//! ```rust
//! use tgui_dom::Document;
//!
//! let doc = Document::new();
//! let panel = doc.create_element("div");
//! doc.append_child(doc.body(), panel).unwrap();
//! doc.add_class(panel, "panel").unwrap();
//! assert!(doc.is_connected(panel));
//! ```

mod error;
mod tree;

pub use error::{DomError, Result};
pub use tree::{Document, NodeId};
