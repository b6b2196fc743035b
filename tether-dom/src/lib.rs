#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! In-memory document tree for the tether template engine.
//!
//! This crate plays the part of the host platform: it owns every node of a
//! document in an [`indextree`] arena, parses HTML fragments with
//! [`html5gum`], serializes nodes back to markup, walks subtrees with a
//! filtered [`TreeWalker`], and dispatches events to registered listeners.
//!
//! Node ids stay valid when a node moves between parents, which is what lets a
//! template keep pointing at the same text node across updates.
//!
//! ```
//! use tether_dom::Document;
//!
//! let mut doc = Document::new();
//! let fragment = doc.parse_fragment("<p class=\"greeting\">Hello</p>").unwrap();
//! let body = doc.create_element("body");
//! doc.append_child(body, fragment).unwrap();
//! assert_eq!(doc.inner_html(body).unwrap(), "<p class=\"greeting\">Hello</p>");
//! ```

mod document;
mod error;
mod event;
mod node;
mod parser;
mod serialize;
mod walker;

mod tracing_macros;

pub use document::Document;
pub use error::DomError;
pub use event::{Event, Listener};
pub use indextree::NodeId;
pub use node::{ElementData, NodeData};
pub use walker::{TreeWalker, WhatToShow};
