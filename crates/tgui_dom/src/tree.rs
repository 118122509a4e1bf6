//! Document tree management

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{DomError, Result};

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug)]
enum NodeKind {
    Element { tag: String },
    Text { content: String },
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    /// Creation order, for [`Document::remove_detached_since`]
    serial: u64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: SmallVec<[String; 4]>,
    attributes: Vec<(String, String)>,
}

impl NodeData {
    fn element(tag: &str, serial: u64) -> Self {
        Self {
            serial,
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            parent: None,
            children: Vec::new(),
            classes: SmallVec::new(),
            attributes: Vec::new(),
        }
    }

    fn text(content: &str, serial: u64) -> Self {
        Self {
            serial,
            kind: NodeKind::Text {
                content: content.to_string(),
            },
            parent: None,
            children: Vec::new(),
            classes: SmallVec::new(),
            attributes: Vec::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

struct DomTree {
    nodes: SlotMap<NodeId, NodeData>,
    document_element: NodeId,
    head: NodeId,
    body: NodeId,
    mutations: u64,
    next_serial: u64,
}

impl DomTree {
    fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let document_element = nodes.insert(NodeData::element("html", 0));
        let head = nodes.insert(NodeData::element("head", 1));
        let body = nodes.insert(NodeData::element("body", 2));
        for child in [head, body] {
            nodes[child].parent = Some(document_element);
            nodes[document_element].children.push(child);
        }
        Self {
            nodes,
            document_element,
            head,
            body,
            mutations: 0,
            next_serial: 3,
        }
    }

    fn insert(&mut self, make: impl FnOnce(u64) -> NodeData) -> NodeId {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.nodes.insert(make(serial))
    }

    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(DomError::NodeNotFound(id))
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(node).and_then(|data| data.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn unlink(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes.get_mut(node).and_then(|data| data.parent.take()) else {
            return false;
        };
        if let Some(parent_data) = self.nodes.get_mut(parent) {
            parent_data.children.retain(|child| *child != node);
        }
        true
    }

    fn collect_subtree(&self, root: NodeId, out: &mut Vec<NodeId>) {
        out.push(root);
        if let Some(data) = self.nodes.get(root) {
            for child in &data.children {
                self.collect_subtree(*child, out);
            }
        }
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(id) else {
            return;
        };
        match &data.kind {
            NodeKind::Text { content } => out.push_str(content),
            NodeKind::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &data.attributes {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                if !data.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", data.classes.join(" "));
                }
                out.push('>');
                for child in &data.children {
                    self.serialize(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

/// Handle to a headless document
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<DomTree>>,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(DomTree::new())),
        }
    }

    /// The root `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.tree.borrow().document_element
    }

    pub fn head(&self) -> NodeId {
        self.tree.borrow().head
    }

    pub fn body(&self) -> NodeId {
        self.tree.borrow().body
    }

    // ========== Node Creation ==========

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree
            .borrow_mut()
            .insert(|serial| NodeData::element(tag, serial))
    }

    /// Create a detached text node
    pub fn create_text(&self, content: &str) -> NodeId {
        self.tree
            .borrow_mut()
            .insert(|serial| NodeData::text(content, serial))
    }

    // ========== Structure ==========

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        let parent_data = tree.node(parent)?;
        if matches!(parent_data.kind, NodeKind::Text { .. }) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        tree.node(child)?;
        if tree.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        tree.unlink(child);
        tree.node_mut(child)?.parent = Some(parent);
        tree.node_mut(parent)?.children.push(child);
        tree.mutations += 1;
        Ok(())
    }

    /// Detach a node from its parent, keeping it alive for reinsertion
    ///
    /// Returns whether the node had a parent.
    pub fn detach(&self, node: NodeId) -> Result<bool> {
        let mut tree = self.tree.borrow_mut();
        tree.node(node)?;
        let detached = tree.unlink(node);
        if detached {
            tree.mutations += 1;
        }
        Ok(detached)
    }

    /// Detach a node and destroy it with its whole subtree
    ///
    /// Removing a node that no longer exists is a no-op.
    pub fn remove_node(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        if !tree.nodes.contains_key(node) {
            return;
        }
        if node == tree.document_element {
            tracing::warn!("Document::remove_node - refusing to remove the document element");
            return;
        }
        if tree.unlink(node) {
            tree.mutations += 1;
        }
        let mut subtree = Vec::new();
        tree.collect_subtree(node, &mut subtree);
        for id in subtree {
            tree.nodes.remove(id);
        }
    }

    /// Marker for nodes created from now on
    pub fn creation_mark(&self) -> u64 {
        self.tree.borrow().next_serial
    }

    /// Destroy every parentless node created since `mark`, with its subtree
    ///
    /// Used to reclaim the nodes of a render that failed halfway. Returns the
    /// number of detached roots removed.
    pub fn remove_detached_since(&self, mark: u64) -> usize {
        let orphans: Vec<NodeId> = {
            let tree = self.tree.borrow();
            tree.nodes
                .iter()
                .filter(|(id, data)| {
                    data.serial >= mark && data.parent.is_none() && *id != tree.document_element
                })
                .map(|(id, _)| id)
                .collect()
        };
        for node in &orphans {
            self.remove_node(*node);
        }
        orphans.len()
    }

    /// Check if a node still exists
    pub fn contains(&self, node: NodeId) -> bool {
        self.tree.borrow().nodes.contains_key(node)
    }

    /// Check if a node is reachable from the document element
    pub fn is_connected(&self, node: NodeId) -> bool {
        let tree = self.tree.borrow();
        tree.nodes.contains_key(node) && tree.is_inclusive_ancestor(tree.document_element, node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().nodes.get(node).and_then(|data| data.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .nodes
            .get(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    /// Lowercase tag name, `None` for text nodes
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        match &self.tree.borrow().nodes.get(node)?.kind {
            NodeKind::Element { tag } => Some(tag.clone()),
            NodeKind::Text { .. } => None,
        }
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let tree = self.tree.borrow();
        let mut subtree = Vec::new();
        tree.collect_subtree(node, &mut subtree);
        subtree
            .into_iter()
            .filter_map(|id| match &tree.nodes.get(id)?.kind {
                NodeKind::Text { content } => Some(content.clone()),
                NodeKind::Element { .. } => None,
            })
            .collect()
    }

    // ========== Attributes ==========

    /// Set an attribute; setting the current value is not a mutation
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        let data = tree.node_mut(node)?;
        match data.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, current)) if current == value => return Ok(()),
            Some((_, current)) => *current = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
        tree.mutations += 1;
        Ok(())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .nodes
            .get(node)
            .and_then(|data| data.attribute(name))
            .map(str::to_string)
    }

    pub fn set_id(&self, node: NodeId, id: &str) -> Result<()> {
        self.set_attribute(node, "id", id)
    }

    /// Find a connected element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        let mut connected = Vec::new();
        tree.collect_subtree(tree.document_element, &mut connected);
        connected
            .into_iter()
            .find(|node| tree.nodes.get(*node).and_then(|data| data.attribute("id")) == Some(id))
    }

    // ========== Class List ==========

    /// Add a class; returns false if it was already present
    pub fn add_class(&self, node: NodeId, class: &str) -> Result<bool> {
        let mut tree = self.tree.borrow_mut();
        let data = tree.node_mut(node)?;
        if data.classes.iter().any(|c| c == class) {
            return Ok(false);
        }
        data.classes.push(class.to_string());
        tree.mutations += 1;
        Ok(true)
    }

    /// Remove a class; returns false if it was not present
    pub fn remove_class(&self, node: NodeId, class: &str) -> Result<bool> {
        let mut tree = self.tree.borrow_mut();
        let data = tree.node_mut(node)?;
        let before = data.classes.len();
        data.classes.retain(|c| c != class);
        if data.classes.len() == before {
            return Ok(false);
        }
        tree.mutations += 1;
        Ok(true)
    }

    /// Add or remove a class depending on `enabled`
    pub fn toggle_class(&self, node: NodeId, class: &str, enabled: bool) -> Result<bool> {
        if enabled {
            self.add_class(node, class)
        } else {
            self.remove_class(node, class)
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree
            .borrow()
            .nodes
            .get(node)
            .is_some_and(|data| data.classes.iter().any(|c| c == class))
    }

    pub fn class_names(&self, node: NodeId) -> Vec<String> {
        self.tree
            .borrow()
            .nodes
            .get(node)
            .map(|data| data.classes.to_vec())
            .unwrap_or_default()
    }

    // ========== Introspection ==========

    /// Number of mutations applied so far (structure, classes, attributes)
    pub fn mutation_count(&self) -> u64 {
        self.tree.borrow().mutations
    }

    /// Number of live nodes, connected or not
    pub fn node_count(&self) -> usize {
        self.tree.borrow().nodes.len()
    }

    /// Serialize a subtree to HTML-like markup
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().serialize(node, &mut out);
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .field("mutations", &self.mutation_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_detached_since_reclaims_orphans() {
        let doc = Document::new();
        let kept = doc.create_element("aside");
        let mark = doc.creation_mark();
        let before = doc.node_count();

        let attached = doc.create_element("div");
        doc.append_child(doc.body(), attached).unwrap();
        let orphan = doc.create_element("div");
        let orphan_child = doc.create_text("lost");
        doc.append_child(orphan, orphan_child).unwrap();

        assert_eq!(doc.remove_detached_since(mark), 1);
        assert!(!doc.contains(orphan));
        assert!(!doc.contains(orphan_child));
        assert!(doc.contains(attached));
        assert!(doc.contains(kept));
        assert_eq!(doc.node_count(), before + 1);
    }

    #[test]
    fn test_append_moves_node() {
        let doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(doc.body(), a).unwrap();
        doc.append_child(doc.body(), b).unwrap();

        doc.append_child(a, child).unwrap();
        doc.append_child(b, child).unwrap();

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), vec![child]);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();

        assert_eq!(
            doc.append_child(inner, outer),
            Err(DomError::HierarchyRequest {
                parent: inner,
                child: outer
            })
        );
        assert!(doc.append_child(outer, outer).is_err());
    }

    #[test]
    fn test_text_node_cannot_have_children() {
        let doc = Document::new();
        let text = doc.create_text("hello");
        let span = doc.create_element("span");
        assert!(matches!(
            doc.append_child(text, span),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_remove_node_destroys_subtree() {
        let doc = Document::new();
        let panel = doc.create_element("div");
        let label = doc.create_text("label");
        doc.append_child(panel, label).unwrap();
        doc.append_child(doc.body(), panel).unwrap();

        doc.remove_node(panel);
        assert!(!doc.contains(panel));
        assert!(!doc.contains(label));
        assert!(doc.children(doc.body()).is_empty());

        // Second removal is a no-op
        doc.remove_node(panel);
        assert_eq!(
            doc.append_child(panel, doc.create_element("i")),
            Err(DomError::NodeNotFound(panel))
        );
    }

    #[test]
    fn test_is_connected() {
        let doc = Document::new();
        let panel = doc.create_element("div");
        assert!(!doc.is_connected(panel));

        doc.append_child(doc.body(), panel).unwrap();
        assert!(doc.is_connected(panel));

        doc.detach(panel).unwrap();
        assert!(!doc.is_connected(panel));
        assert!(doc.contains(panel));
    }

    #[test]
    fn test_class_list_counts_only_changes() {
        let doc = Document::new();
        let root = doc.document_element();
        let before = doc.mutation_count();

        assert!(doc.add_class(root, "theme-dark").unwrap());
        assert!(!doc.add_class(root, "theme-dark").unwrap());
        assert_eq!(doc.mutation_count(), before + 1);
        assert_eq!(doc.class_names(root), vec!["theme-dark".to_string()]);

        assert!(doc.remove_class(root, "theme-dark").unwrap());
        assert!(!doc.remove_class(root, "theme-dark").unwrap());
        assert_eq!(doc.mutation_count(), before + 2);
    }

    #[test]
    fn test_get_element_by_id_only_sees_connected() {
        let doc = Document::new();
        let style = doc.create_element("style");
        doc.set_id(style, "global").unwrap();
        assert_eq!(doc.get_element_by_id("global"), None);

        doc.append_child(doc.head(), style).unwrap();
        assert_eq!(doc.get_element_by_id("global"), Some(style));
    }

    #[test]
    fn test_outer_html() {
        let doc = Document::new();
        let span = doc.create_element("SPAN");
        doc.set_attribute(span, "style", "left:1px").unwrap();
        doc.add_class(span, "wave").unwrap();
        doc.append_child(span, doc.create_text("x")).unwrap();

        assert_eq!(
            doc.outer_html(span),
            "<span style=\"left:1px\" class=\"wave\">x</span>"
        );
        assert_eq!(doc.text_content(span), "x");
    }
}
