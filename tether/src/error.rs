use core::fmt;

use tether_dom::DomError;

use crate::marker::MarkerError;

/// Errors from compiling, rendering or updating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The document rejected an operation.
    Dom(DomError),
    /// A marker-shaped token whose body is not a slot index.
    MalformedMarker {
        /// The offending token.
        text: String,
    },
    /// A marker that names a slot the template does not have.
    SlotOutOfRange {
        /// The index found in the markup.
        index: usize,
        /// How many slots the template was compiled with.
        slots: usize,
    },
    /// `update` was called before `render`.
    NotRendered,
    /// `render` was called a second time.
    AlreadyRendered,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Dom(e) => write!(f, "document error: {e}"),
            TemplateError::MalformedMarker { text } => {
                write!(f, "malformed marker `{text}` in template")
            }
            TemplateError::SlotOutOfRange { index, slots } => {
                write!(f, "marker for slot {index} but template has {slots} slots")
            }
            TemplateError::NotRendered => write!(f, "template updated before first render"),
            TemplateError::AlreadyRendered => write!(f, "template already rendered"),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Dom(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DomError> for TemplateError {
    fn from(e: DomError) -> Self {
        TemplateError::Dom(e)
    }
}

impl From<MarkerError> for TemplateError {
    fn from(e: MarkerError) -> Self {
        TemplateError::MalformedMarker { text: e.token }
    }
}
