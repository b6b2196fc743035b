use core::fmt;

use tether::TemplateError;
use tether::tether_dom::DomError;

/// Errors from component hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    /// The attribute is not in the component's bound attribute table.
    UnknownAttribute(String),
    /// `connect` was called on a host that is already connected.
    AlreadyConnected,
    /// The host's template was in use when a re-render was requested.
    Reentrant,
    /// Rendering or updating the template failed.
    Template(TemplateError),
    /// The document rejected an operation.
    Dom(DomError),
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementError::UnknownAttribute(name) => write!(f, "`{name}` is not a bound attribute"),
            ElementError::AlreadyConnected => write!(f, "element already connected"),
            ElementError::Reentrant => write!(f, "element re-rendered while rendering"),
            ElementError::Template(e) => write!(f, "template error: {e}"),
            ElementError::Dom(e) => write!(f, "document error: {e}"),
        }
    }
}

impl std::error::Error for ElementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ElementError::Template(e) => Some(e),
            ElementError::Dom(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TemplateError> for ElementError {
    fn from(e: TemplateError) -> Self {
        ElementError::Template(e)
    }
}

impl From<DomError> for ElementError {
    fn from(e: DomError) -> Self {
        ElementError::Dom(e)
    }
}
