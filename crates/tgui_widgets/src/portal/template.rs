use std::rc::Rc;

use tgui_dom::{Document, NodeId, Result};

/// Something that can instantiate a view into a document
///
/// Each call builds a fresh set of detached nodes and returns their roots.
/// Closures `Fn(&Document) -> Result<Vec<NodeId>>` are templates.
pub trait Template {
    fn render(&self, document: &Document) -> Result<Vec<NodeId>>;
}

impl<F> Template for F
where
    F: Fn(&Document) -> Result<Vec<NodeId>>,
{
    fn render(&self, document: &Document) -> Result<Vec<NodeId>> {
        self(document)
    }
}

/// Wrap a closure as a shareable template
pub fn from_fn<F>(render: F) -> Rc<dyn Template>
where
    F: Fn(&Document) -> Result<Vec<NodeId>> + 'static,
{
    Rc::new(render)
}

/// The nodes instantiated from one template
#[derive(Debug)]
pub struct EmbeddedView {
    roots: Vec<NodeId>,
}

impl EmbeddedView {
    pub fn create(template: &dyn Template, document: &Document) -> Result<Self> {
        Ok(Self {
            roots: template.render(document)?,
        })
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Remove every root (and its subtree) from the document
    pub fn destroy(self, document: &Document) {
        for root in self.roots {
            document.remove_node(root);
        }
    }
}
