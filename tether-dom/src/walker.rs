//! Filtered preorder traversal.

use bitflags::bitflags;
use indextree::NodeId;

use crate::{Document, NodeData};

bitflags! {
    /// Which node kinds a [`TreeWalker`] yields.
    ///
    /// Bit values follow the DOM `NodeFilter` constants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WhatToShow: u32 {
        /// Element nodes.
        const ELEMENT = 0x1;
        /// Text nodes.
        const TEXT = 0x4;
        /// Comment nodes.
        const COMMENT = 0x80;
    }
}

impl WhatToShow {
    fn accepts(self, data: &NodeData) -> bool {
        match data {
            NodeData::Element(_) => self.contains(WhatToShow::ELEMENT),
            NodeData::Text(_) => self.contains(WhatToShow::TEXT),
            NodeData::Comment(_) => self.contains(WhatToShow::COMMENT),
            NodeData::Fragment | NodeData::ShadowRoot => false,
        }
    }
}

/// Walks the descendants of a root in document order, skipping the root and
/// every node kind not selected by its [`WhatToShow`].
///
/// Skipped nodes are still descended into, so an element's text children are
/// visited even when elements themselves are filtered out.
pub struct TreeWalker<'a> {
    doc: &'a Document,
    show: WhatToShow,
    inner: indextree::Descendants<'a, NodeData>,
}

impl<'a> TreeWalker<'a> {
    /// Create a walker over the descendants of `root`.
    pub fn new(doc: &'a Document, root: NodeId, show: WhatToShow) -> Self {
        let mut inner = root.descendants(doc.arena());
        // Descendants starts with the root itself.
        inner.next();
        Self { doc, show, inner }
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.inner.next()?;
            if let Ok(data) = self.doc.get(id)
                && self.show.accepts(data)
            {
                return Some(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_filters_kinds() {
        let mut doc = Document::new();
        let fragment = doc
            .parse_fragment("<div a=\"1\">text<!-- c --><span>inner</span></div>tail")
            .unwrap();

        let all: Vec<_> = TreeWalker::new(
            &doc,
            fragment,
            WhatToShow::ELEMENT | WhatToShow::TEXT | WhatToShow::COMMENT,
        )
        .collect();
        assert_eq!(all.len(), 6);

        let texts: Vec<_> = TreeWalker::new(&doc, fragment, WhatToShow::TEXT)
            .filter_map(|id| doc.text(id))
            .collect();
        assert_eq!(texts, vec!["text", "inner", "tail"]);

        let tags: Vec<_> = TreeWalker::new(&doc, fragment, WhatToShow::ELEMENT)
            .filter_map(|id| doc.tag(id))
            .collect();
        assert_eq!(tags, vec!["div", "span"]);
    }

    #[test]
    fn test_walk_skips_root() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert_eq!(TreeWalker::new(&doc, div, WhatToShow::all()).count(), 0);
    }
}
