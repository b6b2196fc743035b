//! HTML fragment parsing using html5gum.

use html5gum::emitters::callback::{CallbackEmitter, CallbackEvent};
use html5gum::{Span, State, Tokenizer};
use indextree::NodeId;

use crate::node::is_void_element;
use crate::{Document, DomError, ElementData, NodeData};

/// One tokenizer event with its bytes copied out of the tokenizer's buffers.
///
/// Start tags arrive in pieces so attributes keep the order they were
/// written in.
#[derive(Debug, PartialEq)]
enum Piece {
    OpenTag(String),
    AttributeName(String),
    AttributeValue(String),
    CloseTag { self_closing: bool },
    EndTag(String),
    Text(String),
    Comment(String),
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn piece(event: CallbackEvent<'_>, _span: Span<()>) -> Option<Piece> {
    Some(match event {
        CallbackEvent::OpenStartTag { name } => Piece::OpenTag(lossy(name).to_ascii_lowercase()),
        CallbackEvent::AttributeName { name } => Piece::AttributeName(lossy(name)),
        CallbackEvent::AttributeValue { value } => Piece::AttributeValue(lossy(value)),
        CallbackEvent::CloseStartTag { self_closing } => Piece::CloseTag { self_closing },
        CallbackEvent::EndTag { name } => Piece::EndTag(lossy(name).to_ascii_lowercase()),
        CallbackEvent::String { value } => Piece::Text(lossy(value)),
        CallbackEvent::Comment { value } => Piece::Comment(lossy(value)),
        CallbackEvent::Doctype { .. } | CallbackEvent::Error(_) => return None,
    })
}

/// Record an attribute on a start tag. A repeated name keeps its first value.
fn add_attribute(data: &mut ElementData, name: String, value: String) {
    data.attrs.entry(name).or_insert(value);
}

impl Document {
    /// Parse `markup` into a new detached fragment and return the fragment.
    ///
    /// Unlike a full document parse, text and comments at the top level are
    /// kept as children of the fragment. Comments become comment nodes,
    /// adjacent text is merged into one text node, stray end tags are ignored
    /// and elements still open at the end of input are closed. Attributes
    /// keep their source order.
    pub fn parse_fragment(&mut self, markup: &str) -> Result<NodeId, DomError> {
        let fragment = self.create_fragment();
        let mut tokenizer = Tokenizer::new_with_emitter(markup, CallbackEmitter::new(piece));
        // Open elements, innermost last.
        let mut stack: Vec<NodeId> = Vec::new();
        // The start tag being read, and its attribute still waiting for a value.
        let mut open: Option<ElementData> = None;
        let mut pending: Option<String> = None;

        while let Some(result) = tokenizer.next() {
            let piece = result.map_err(|_| DomError::Parse("tokenizer error".into()))?;
            let parent = stack.last().copied().unwrap_or(fragment);

            match piece {
                Piece::OpenTag(name) => {
                    open = Some(ElementData::new(name));
                    pending = None;
                }
                Piece::AttributeName(name) => {
                    // End tags can carry attributes too; those are dropped.
                    if let Some(data) = open.as_mut()
                        && let Some(previous) = pending.replace(name)
                    {
                        add_attribute(data, previous, String::new());
                    }
                }
                Piece::AttributeValue(value) => {
                    if let Some(data) = open.as_mut()
                        && let Some(name) = pending.take()
                    {
                        add_attribute(data, name, value);
                    }
                }
                Piece::CloseTag { self_closing } => {
                    let Some(mut data) = open.take() else {
                        continue;
                    };
                    if let Some(name) = pending.take() {
                        add_attribute(&mut data, name, String::new());
                    }
                    let name = data.tag.clone();
                    let elem = self.create_node(NodeData::Element(data));
                    self.append_child(parent, elem)?;

                    if !(self_closing || is_void_element(&name)) {
                        // Raw text elements need the tokenizer in a different state.
                        match name.as_str() {
                            "script" | "style" => tokenizer.set_state(State::ScriptData),
                            "textarea" | "title" => tokenizer.set_state(State::RcData),
                            _ => {}
                        }
                        stack.push(elem);
                    }
                }
                Piece::EndTag(end_name) => {
                    open = None;
                    pending = None;
                    let matching = stack
                        .iter()
                        .rposition(|&node| self.tag(node) == Some(end_name.as_str()));
                    if let Some(idx) = matching {
                        stack.truncate(idx);
                    }
                }
                Piece::Text(text) => {
                    self.push_text(parent, &text)?;
                }
                Piece::Comment(text) => {
                    let comment = self.create_comment(text);
                    self.append_child(parent, comment)?;
                }
            }
        }

        Ok(fragment)
    }

    /// Append text to `parent`, extending its last child if that is a text node.
    fn push_text(&mut self, parent: NodeId, text: &str) -> Result<(), DomError> {
        if text.is_empty() {
            return Ok(());
        }
        if let Some(last) = self.last_child(parent)
            && let NodeData::Text(existing) = self.get_mut(last)?
        {
            existing.push_str(text);
            return Ok(());
        }
        let node = self.create_text(text);
        self.append_child(parent, node)
    }
}
