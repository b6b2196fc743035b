#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

//! Components that own a host element and keep a [`tether`] template in sync
//! with a table of bound attributes.
//!
//! A [`Component`] lists its bound attributes, each with a [`Coercion`] that
//! decides how the attribute text is read back. [`Host::connect`] renders the
//! component into its element once. After that, every [`Host::set`] writes
//! the attribute, asks the component for a fresh template, and forwards only
//! that template's values to the live one.

mod component;
mod error;
mod host;

pub use component::{BoundAttribute, Coercion, Component};
pub use error::ElementError;
pub use host::Host;

use tether::tether_dom::{__debug as debug, __trace as trace};
