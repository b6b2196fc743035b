use tether_dom::{Document, DomError, NodeId};

use crate::error::TemplateError;
use crate::marker;
use crate::trace;
use crate::value::Value;

/// A text node whose text contains one or more markers.
#[derive(Debug, Clone)]
pub struct ContentPart {
    node: NodeId,
    base: String,
    indices: Vec<usize>,
}

impl ContentPart {
    pub(crate) fn new(doc: &Document, node: NodeId) -> Result<Self, TemplateError> {
        let base = doc.text(node).ok_or(DomError::NotText(node))?.to_owned();
        let indices = marker::indices(&base)?;
        Ok(Self {
            node,
            base,
            indices,
        })
    }

    /// The bound text node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The node's text as it was in the compiled markup, markers included.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Slot indices in the order their markers appear.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The text this part would write for `values`.
    pub fn render<C>(&self, values: &[Value<C>]) -> String {
        marker::substitute(&self.base, |index| match values.get(index) {
            None | Some(Value::Null) => String::new(),
            Some(value) => value.to_string(),
        })
    }

    /// Overwrite the node's text with the base text, markers substituted.
    pub fn update<C>(&self, doc: &mut Document, values: &[Value<C>]) -> Result<(), TemplateError> {
        let text = self.render(values);
        trace!(node = ?self.node, %text, "content update");
        doc.set_text(self.node, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::encode;

    fn part(doc: &mut Document, text: &str) -> ContentPart {
        let node = doc.create_text(text);
        ContentPart::new(doc, node).unwrap()
    }

    #[test]
    fn test_substitutes_every_marker() {
        let mut doc = Document::new();
        let p = part(&mut doc, &format!("{} + {} = {}", encode(0), encode(0), encode(1)));
        assert_eq!(p.indices(), &[0, 0, 1]);

        p.update(&mut doc, &[Value::<()>::from(2), Value::from(4)]).unwrap();
        assert_eq!(doc.text(p.node()), Some("2 + 2 = 4"));
    }

    #[test]
    fn test_null_is_empty_but_undefined_is_not() {
        let mut doc = Document::new();
        let p = part(&mut doc, &format!("[{}][{}]", encode(0), encode(1)));
        p.update(&mut doc, &[Value::<()>::Null, Value::Undefined]).unwrap();
        assert_eq!(doc.text(p.node()), Some("[][undefined]"));
    }

    #[test]
    fn test_missing_values_are_empty() {
        let mut doc = Document::new();
        let p = part(&mut doc, &format!("a{}b{}c", encode(0), encode(5)));
        p.update(&mut doc, &[Value::<()>::from("x")]).unwrap();
        assert_eq!(doc.text(p.node()), Some("axbc"));
    }

    #[test]
    fn test_update_rewrites_from_base_each_time() {
        let mut doc = Document::new();
        let p = part(&mut doc, &format!("Hello {}", encode(0)));
        p.update(&mut doc, &[Value::<()>::from("world")]).unwrap();
        p.update(&mut doc, &[Value::<()>::from("y'all")]).unwrap();
        assert_eq!(doc.text(p.node()), Some("Hello y'all"));
        assert_eq!(p.base(), format!("Hello {}", encode(0)));
    }

    #[test]
    fn test_rejects_malformed_marker() {
        let mut doc = Document::new();
        let node = doc.create_text("oops ---!{zero}!---");
        let err = ContentPart::new(&doc, node).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MalformedMarker {
                text: "---!{zero}!---".into()
            }
        );
    }
}
