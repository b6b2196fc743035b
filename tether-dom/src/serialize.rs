//! Markup serialization.

use indextree::NodeId;

use crate::{Document, DomError, NodeData};

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

impl Document {
    /// Serialize a node and its subtree to markup.
    ///
    /// Fragments and shadow roots have no markup of their own, so for them
    /// this is the same as [`Document::inner_html`]. Element properties and
    /// shadow roots are not part of the output.
    pub fn to_html(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        self.write_html(id, &mut out)?;
        Ok(out)
    }

    /// Serialize the children of a node to markup.
    pub fn inner_html(&self, id: NodeId) -> Result<String, DomError> {
        self.get(id)?;
        let mut out = String::new();
        for child in self.children(id) {
            self.write_html(child, &mut out)?;
        }
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> Result<(), DomError> {
        match self.get(id)? {
            NodeData::Text(s) => out.push_str(&escape_text(s)),
            NodeData::Comment(s) => {
                out.push_str("<!--");
                out.push_str(s);
                out.push_str("-->");
            }
            NodeData::Fragment | NodeData::ShadowRoot => {
                for child in self.children(id) {
                    self.write_html(child, out)?;
                }
            }
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                for (name, value) in &elem.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if elem.is_void() {
                    return Ok(());
                }
                for child in self.children(id) {
                    self.write_html(child, out)?;
                }
                out.push_str("</");
                out.push_str(&elem.tag);
                out.push('>');
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize_roundtrip() {
        let markup = "<ul id=\"list\"><li>one</li><li>two<br></li></ul><!-- end -->";
        let mut doc = Document::new();
        let fragment = doc.parse_fragment(markup).unwrap();
        assert_eq!(doc.to_html(fragment).unwrap(), markup);
    }

    #[test]
    fn test_escaping() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "title", "say \"hi\" & go").unwrap();
        let text = doc.create_text("1 < 2 & 3 > 2, y'all");
        doc.append_child(div, text).unwrap();

        assert_eq!(
            doc.to_html(div).unwrap(),
            "<div title=\"say &quot;hi&quot; &amp; go\">1 &lt; 2 &amp; 3 &gt; 2, y'all</div>"
        );
    }

    #[test]
    fn test_properties_are_not_serialized() {
        let mut doc = Document::new();
        let input = doc.create_element("input");
        doc.set_property(input, "value", "typed").unwrap();
        assert_eq!(doc.to_html(input).unwrap(), "<input>");
        assert_eq!(doc.property(input, "value"), Some("typed"));
    }
}
