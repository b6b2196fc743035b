//! Slot values.

use core::fmt;
use std::rc::Rc;

use tether_dom::{Document, Event};

/// An event handler carried in a slot.
///
/// When an attribute slot holds a handler, the attribute becomes an event
/// binding and the handler is called with the render context as receiver.
pub struct Handler<C>(Rc<dyn Fn(&C, &mut Document, &Event)>);

impl<C> Handler<C> {
    /// Wrap a closure as a handler.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&C, &mut Document, &Event) + 'static,
    {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, context: &C, doc: &mut Document, event: &Event) {
        (self.0)(context, doc, event)
    }

    /// True if both handles point at the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<C> Clone for Handler<C> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler")
    }
}

/// The current value of one slot.
///
/// Data variants are coerced to text when substituted. `Null` and
/// `Undefined` are kept apart because they substitute differently: a text
/// slot renders `Null` as nothing but `Undefined` as `undefined`, and an
/// `Undefined` slot at compile time gets a comment anchor instead of an
/// inline marker.
pub enum Value<C> {
    /// An explicitly empty value.
    Null,
    /// No value at all.
    Undefined,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// An event handler.
    Handler(Handler<C>),
}

impl<C> Value<C> {
    /// Wrap a closure as a handler value.
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&C, &mut Document, &Event) + 'static,
    {
        Value::Handler(Handler::new(f))
    }

    /// True if this value is a handler.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Handler(_))
    }

    /// The handler, if this value is one.
    pub fn as_handler(&self) -> Option<&Handler<C>> {
        match self {
            Value::Handler(h) => Some(h),
            _ => None,
        }
    }

    /// True for `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// True for values that count as false: null, undefined, `false`, zero,
    /// NaN and empty text.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null | Value::Undefined => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0 || f.is_nan(),
            Value::Text(s) => s.is_empty(),
            Value::Handler(_) => false,
        }
    }

    /// True for values that are not [falsy](Value::is_falsy).
    pub fn is_truthy(&self) -> bool {
        !self.is_falsy()
    }

    /// Display text, or the empty string for falsy values.
    pub fn to_text_or_empty(&self) -> String {
        if self.is_falsy() {
            String::new()
        } else {
            self.to_string()
        }
    }
}

fn fmt_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
    } else if v == 0.0 {
        f.write_str("0")
    } else {
        write!(f, "{v}")
    }
}

impl<C> fmt::Display for Value<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => fmt_float(*v, f),
            Value::Text(s) => f.write_str(s),
            Value::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl<C> fmt::Debug for Value<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Undefined => f.write_str("Undefined"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Handler(h) => h.fmt(f),
        }
    }
}

impl<C> Clone for Value<C> {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Undefined => Value::Undefined,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::Float(v) => Value::Float(*v),
            Value::Text(s) => Value::Text(s.clone()),
            Value::Handler(h) => Value::Handler(h.clone()),
        }
    }
}

impl<C> PartialEq for Value<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Handler(a), Value::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<C> From<&str> for Value<C> {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl<C> From<String> for Value<C> {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<C> From<&String> for Value<C> {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl<C> From<bool> for Value<C> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<C> From<i32> for Value<C> {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl<C> From<i64> for Value<C> {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl<C> From<u32> for Value<C> {
    fn from(i: u32) -> Self {
        Value::Int(i.into())
    }
}

impl<C> From<usize> for Value<C> {
    fn from(i: usize) -> Self {
        i64::try_from(i)
            .map(Value::Int)
            .unwrap_or(Value::Float(i as f64))
    }
}

impl<C> From<f64> for Value<C> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<C> From<Handler<C>> for Value<C> {
    fn from(h: Handler<C>) -> Self {
        Value::Handler(h)
    }
}

/// `None` becomes [`Value::Null`].
impl<C, T: Into<Value<C>>> From<Option<T>> for Value<C> {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
