//! Events and listeners.

use std::fmt;
use std::rc::Rc;

use indextree::NodeId;

use crate::Document;

/// A callback registered on a node for one event kind.
///
/// Listeners get the document mutably so a handler can run a full update
/// cycle before dispatch returns.
pub type Listener = Rc<dyn Fn(&mut Document, &Event)>;

/// An event travelling from its target up through the target's ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event kind, e.g. `click`.
    pub kind: String,
    /// The node the event was dispatched on.
    pub target: NodeId,
}

impl Event {
    /// Create an event of `kind` aimed at `target`.
    pub fn new(kind: impl Into<String>, target: NodeId) -> Self {
        Self {
            kind: kind.into(),
            target,
        }
    }
}

/// One listener registration on a node.
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) kind: String,
    pub(crate) listener: Listener,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
