//! Parts: bindings between one place in the rendered tree and the slots that
//! feed it.

mod attribute;
mod content;

use core::fmt;
use std::collections::BTreeMap;
use std::rc::Rc;

pub use attribute::{AttributeBinding, AttributePart};
pub use content::ContentPart;
use tether_dom::{Document, NodeId};

use crate::error::TemplateError;
use crate::value::Value;

/// A discovered part.
pub enum Part<C> {
    /// A text node with markers.
    Content(ContentPart),
    /// An element with bound attributes.
    Attribute(AttributePart<C>),
}

impl<C: 'static> Part<C> {
    /// The node this part writes to.
    pub fn node(&self) -> NodeId {
        match self {
            Part::Content(p) => p.node(),
            Part::Attribute(p) => p.element(),
        }
    }

    /// Slot indices this part reads, in discovery order.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            Part::Content(p) => p.indices().to_vec(),
            Part::Attribute(p) => p.indices().collect(),
        }
    }

    pub(crate) fn init(&mut self, context: &Rc<C>) {
        if let Part::Attribute(p) = self {
            p.init(context);
        }
    }

    pub(crate) fn update(&mut self, doc: &mut Document, values: &[Value<C>]) -> Result<(), TemplateError> {
        match self {
            Part::Content(p) => p.update(doc, values),
            Part::Attribute(p) => p.update(doc, values),
        }
    }
}

impl<C> fmt::Debug for Part<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Content(p) => f.debug_tuple("Content").field(p).finish(),
            Part::Attribute(p) => f.debug_tuple("Attribute").field(p).finish(),
        }
    }
}

/// Which parts consume which slot.
///
/// Parts are referred to by their position in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartRegistry {
    by_slot: BTreeMap<usize, Vec<usize>>,
}

impl PartRegistry {
    pub(crate) fn register(&mut self, slot: usize, part: usize) {
        let parts = self.by_slot.entry(slot).or_default();
        if !parts.contains(&part) {
            parts.push(part);
        }
    }

    /// Positions of the parts that read `slot`.
    pub fn parts_for(&self, slot: usize) -> &[usize] {
        self.by_slot.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Slots that at least one part reads, ascending.
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_slot.keys().copied()
    }

    /// True if no part reads any slot.
    pub fn is_empty(&self) -> bool {
        self.by_slot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_dedups_per_slot() {
        let mut registry = PartRegistry::default();
        registry.register(2, 0);
        registry.register(2, 0);
        registry.register(2, 3);
        registry.register(0, 1);
        assert_eq!(registry.parts_for(2), &[0, 3]);
        assert_eq!(registry.parts_for(9), &[] as &[usize]);
        assert_eq!(registry.slots().collect::<Vec<_>>(), vec![0, 2]);
    }
}
