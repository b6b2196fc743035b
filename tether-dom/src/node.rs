//! Node payloads stored in the document arena.

use indexmap::IndexMap;
use indextree::NodeId;

/// HTML void elements that cannot have children.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// The payload of one node in a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// A detached container. Appending a fragment moves its children instead
    /// of the fragment itself.
    Fragment,
    /// An element with a tag, attributes and properties.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment node.
    Comment(String),
    /// The root of an element's isolated rendering boundary.
    ShadowRoot,
}

impl NodeData {
    /// Returns the element payload, if this is an element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the character data of a text or comment node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeData::Text(t) | NodeData::Comment(t) => Some(t),
            _ => None,
        }
    }

    /// True for comment nodes.
    pub fn is_comment(&self) -> bool {
        matches!(self, NodeData::Comment(_))
    }
}

/// An element's tag, attributes and properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    /// Tag name, lowercase.
    pub tag: String,
    /// Attributes in document order.
    pub attrs: IndexMap<String, String>,
    /// Direct properties. These never show up in serialized markup.
    pub props: IndexMap<String, String>,
    /// Shadow root attached to this element, if any.
    pub shadow_root: Option<NodeId>,
}

impl ElementData {
    /// Create an element payload with just a tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// True if the element cannot have children.
    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag)
    }
}
