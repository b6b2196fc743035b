#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! Markup templates that update in place.
//!
//! A template is a list of static strings with value slots between them. On
//! first render every slot is replaced by a marker (see [`marker`]), the
//! annotated markup is parsed into a [`tether_dom`] tree once, and that tree
//! is walked once to find the places markers ended up. Those places become
//! parts: text nodes ([`ContentPart`]) and elements with bound attributes
//! ([`AttributePart`]). Each later update hands the new values to every part,
//! which rewrites its own node. Nothing is parsed again.
//!
//! ```
//! use std::rc::Rc;
//! use tether::{html, Document, NodeId, RenderContext, Value};
//!
//! struct Page {
//!     root: NodeId,
//! }
//!
//! impl RenderContext for Page {
//!     fn host(&self) -> NodeId {
//!         self.root
//!     }
//! }
//!
//! let mut doc = Document::new();
//! let page = Rc::new(Page { root: doc.create_element("main") });
//!
//! let mut template = html(&["<h1>Hello ", "</h1>"], vec![Value::from("world")]);
//! template.render(&mut doc, &page, None)?;
//! assert_eq!(doc.inner_html(page.root)?, "<h1>Hello world</h1>");
//!
//! template.update(&mut doc, vec![Value::from("y'all")])?;
//! assert_eq!(doc.inner_html(page.root)?, "<h1>Hello y'all</h1>");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Attributes named `@event` whose slot holds a [`Handler`] become event
//! listeners. Attributes named `[prop]` write to the element's property map
//! instead of its attributes.

mod error;
pub mod marker;
pub mod part;
mod template;
mod value;

pub use error::TemplateError;
pub use part::{AttributeBinding, AttributePart, ContentPart, Part, PartRegistry};
pub use template::{RenderContext, Template};
pub use tether_dom;
pub use tether_dom::{Document, Event, NodeId};
pub use value::{Handler, Value};

use tether_dom::{__debug as debug, __trace as trace, __warn as warning};

/// Create a template from static strings and the values between them.
///
/// `strings` and `values` interleave: `strings[0]`, `values[0]`,
/// `strings[1]`, and so on.
pub fn html<C>(strings: &[&str], values: Vec<Value<C>>) -> Template<C> {
    Template::new(strings.iter().copied(), values)
}
