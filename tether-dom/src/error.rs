//! Error types for document operations.

use core::fmt;

use indextree::NodeId;

/// Error type for document operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The markup could not be tokenized.
    Parse(String),

    /// The node id does not belong to this document, or the node was removed.
    UnknownNode(NodeId),

    /// The operation needs an element but got another kind of node.
    NotAnElement(NodeId),

    /// The operation needs a text-bearing node (text or comment).
    NotText(NodeId),

    /// The arena refused a structural change (appending a node to itself or
    /// to one of its descendants).
    Tree(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::Parse(msg) => write!(f, "markup parse error: {msg}"),
            DomError::UnknownNode(id) => write!(f, "unknown node {id:?}"),
            DomError::NotAnElement(id) => write!(f, "node {id:?} is not an element"),
            DomError::NotText(id) => write!(f, "node {id:?} does not carry text"),
            DomError::Tree(msg) => write!(f, "tree error: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

impl From<indextree::NodeError> for DomError {
    fn from(e: indextree::NodeError) -> Self {
        DomError::Tree(e.to_string())
    }
}
