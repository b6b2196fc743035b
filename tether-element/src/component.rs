use tether::{Document, Template, Value};

use crate::error::ElementError;
use crate::host::Host;

/// How a bound attribute's text is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// The attribute text as is.
    Text,
    /// The attribute text parsed as a number. Empty text is zero and
    /// unparseable text is NaN.
    Number,
    /// Whether the attribute is present with non-empty text.
    Boolean,
}

impl Coercion {
    /// Coerce a raw attribute value. `None` means the attribute is absent.
    pub fn apply<C>(self, raw: Option<&str>) -> Value<C> {
        match (self, raw) {
            (Coercion::Boolean, raw) => Value::Bool(raw.is_some_and(|s| !s.is_empty())),
            (_, None) => Value::Null,
            (Coercion::Text, Some(s)) => Value::Text(s.to_owned()),
            (Coercion::Number, Some(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    Value::Int(0)
                } else if let Ok(i) = s.parse::<i64>() {
                    Value::Int(i)
                } else {
                    Value::Float(s.parse().unwrap_or(f64::NAN))
                }
            }
        }
    }
}

/// One entry of a component's bound attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAttribute {
    /// Attribute name on the host element.
    pub name: &'static str,
    /// How the attribute is read back.
    pub coercion: Coercion,
}

impl BoundAttribute {
    /// A table entry.
    pub const fn new(name: &'static str, coercion: Coercion) -> Self {
        Self { name, coercion }
    }
}

/// A component rendered into a host element.
///
/// Setting one of the [`BOUND_ATTRIBUTES`](Component::BOUND_ATTRIBUTES)
/// through [`Host::set`] writes the host attribute and, once the host is
/// connected, renders again and forwards the fresh values to the live
/// template.
pub trait Component: Sized + 'static {
    /// Tag name of the host element.
    const TAG: &'static str;

    /// Attributes that trigger a re-render when set.
    const BOUND_ATTRIBUTES: &'static [BoundAttribute] = &[];

    /// Called once, right after the host element is created.
    fn created(host: &Host<Self>, doc: &mut Document) -> Result<(), ElementError> {
        let _ = (host, doc);
        Ok(())
    }

    /// Build the template for the host's current state.
    ///
    /// Called on connect and again after every bound attribute change. Only
    /// the first result is rendered; later ones just supply values.
    fn render(host: &Host<Self>, doc: &Document) -> Result<Template<Host<Self>>, ElementError>;
}
