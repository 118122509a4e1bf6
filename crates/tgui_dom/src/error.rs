//! Document error types

use thiserror::Error;

use crate::NodeId;

/// Document manipulation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node was removed from the document or never existed
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The node exists but is not connected to the document root
    #[error("Node is detached from the document: {0:?}")]
    Detached(NodeId),

    /// The insertion would create a cycle or target a text node
    #[error("Invalid hierarchy: cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DomError>;
