//! The document: an arena of nodes plus the listeners registered on them.

use std::collections::HashMap;

use indexmap::IndexMap;
use indextree::{Arena, NodeId};

use crate::event::Registration;
use crate::tracing_macros::trace;
use crate::{DomError, ElementData, Event, Listener, NodeData};

/// A document owning every node created through it.
///
/// Nodes are addressed by [`NodeId`]. An id stays valid until the node is
/// removed, including across moves between parents.
#[derive(Debug, Default)]
pub struct Document {
    arena: Arena<NodeData>,
    listeners: HashMap<NodeId, Vec<Registration>>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn arena(&self) -> &Arena<NodeData> {
        &self.arena
    }

    /// Get the payload of a node.
    pub fn get(&self, id: NodeId) -> Result<&NodeData, DomError> {
        match self.arena.get(id) {
            Some(node) if !node.is_removed() => Ok(node.get()),
            _ => Err(DomError::UnknownNode(id)),
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        match self.arena.get_mut(id) {
            Some(node) if !node.is_removed() => Ok(node.get_mut()),
            _ => Err(DomError::UnknownNode(id)),
        }
    }

    fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.get(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.get_mut(id)? {
            NodeData::Element(e) => Ok(e),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// True if `id` names a live node of this document.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    /// Create a detached node from a payload.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        self.arena.new_node(data)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.create_node(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeData::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeData::Comment(text.into()))
    }

    /// Create an empty fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.create_node(NodeData::Fragment)
    }

    /// Give `host` an isolated rendering boundary and return its root.
    ///
    /// Attaching twice returns the existing root.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        if let Some(root) = self.element(host)?.shadow_root {
            return Ok(root);
        }
        let root = self.create_node(NodeData::ShadowRoot);
        self.element_mut(host)?.shadow_root = Some(root);
        Ok(root)
    }

    /// The shadow root of `host`, if one was attached.
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host).ok().and_then(|e| e.shadow_root)
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` is a fragment, its children are moved over in order and the
    /// fragment is left empty. A child that already has a parent is detached
    /// from it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        match self.get(parent)? {
            NodeData::Element(_) | NodeData::Fragment | NodeData::ShadowRoot => {}
            _ => return Err(DomError::NotAnElement(parent)),
        }
        if matches!(self.get(child)?, NodeData::Fragment) {
            let moved: Vec<NodeId> = child.children(&self.arena).collect();
            trace!(count = moved.len(), "moving fragment children");
            for node in moved {
                node.detach(&mut self.arena);
                parent.checked_append(node, &mut self.arena)?;
            }
            return Ok(());
        }
        child.detach(&mut self.arena);
        parent.checked_append(child, &mut self.arena)?;
        Ok(())
    }

    /// Remove a node and its whole subtree, dropping their listeners.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.get(id)?;
        let doomed: Vec<NodeId> = id.descendants(&self.arena).collect();
        for node in &doomed {
            self.listeners.remove(node);
        }
        id.remove_subtree(&mut self.arena);
        Ok(())
    }

    /// The parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent())
    }

    /// The children of a node, in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// The first child of a node.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.first_child())
    }

    /// The last child of a node.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.last_child())
    }

    /// The node itself followed by all its descendants, in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena)
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|e| e.tag.as_str())
    }

    /// Character data of a text or comment node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).ok().and_then(NodeData::as_text)
    }

    /// Replace the character data of a text or comment node in place.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        match self.get_mut(id)? {
            NodeData::Text(t) | NodeData::Comment(t) => {
                *t = text.into();
                Ok(())
            }
            _ => Err(DomError::NotText(id)),
        }
    }

    /// Get an attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|e| e.get_attr(name))
    }

    /// All attributes of an element, in document order.
    pub fn attributes(&self, id: NodeId) -> Result<&IndexMap<String, String>, DomError> {
        Ok(&self.element(id)?.attrs)
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.element_mut(id)?.attrs.insert(name.into(), value.into());
        Ok(())
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element_mut(id)?.attrs.shift_remove(name))
    }

    /// Get a direct property of an element.
    pub fn property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .ok()
            .and_then(|e| e.props.get(name))
            .map(|s| s.as_str())
    }

    /// Set a direct property of an element.
    pub fn set_property(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.element_mut(id)?.props.insert(name.into(), value.into());
        Ok(())
    }

    /// Register `listener` for events of `kind` on `id`.
    ///
    /// Registering the same listener twice makes it run twice.
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        kind: impl Into<String>,
        listener: Listener,
    ) -> Result<(), DomError> {
        self.get(id)?;
        let kind = kind.into();
        trace!(?id, %kind, "adding event listener");
        self.listeners
            .entry(id)
            .or_default()
            .push(Registration { kind, listener });
        Ok(())
    }

    /// Number of listeners registered on `id` for `kind`.
    pub fn listener_count(&self, id: NodeId, kind: &str) -> usize {
        self.listeners
            .get(&id)
            .map(|regs| regs.iter().filter(|r| r.kind == kind).count())
            .unwrap_or(0)
    }

    /// Dispatch `event` to its target, then to each ancestor of the target.
    ///
    /// The listener list is snapshotted before the first listener runs, so
    /// listeners added during dispatch do not see this event. Returns the
    /// number of listeners invoked.
    pub fn dispatch_event(&mut self, event: Event) -> Result<usize, DomError> {
        self.get(event.target)?;
        let path: Vec<NodeId> = event.target.ancestors(&self.arena).collect();
        let listeners: Vec<Listener> = path
            .iter()
            .filter_map(|node| self.listeners.get(node))
            .flatten()
            .filter(|reg| reg.kind == event.kind)
            .map(|reg| reg.listener.clone())
            .collect();
        trace!(kind = %event.kind, count = listeners.len(), "dispatching event");
        for listener in &listeners {
            listener(self, &event);
        }
        Ok(listeners.len())
    }
}
