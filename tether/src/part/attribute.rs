use core::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tether_dom::{Document, Event, Listener, NodeId};

use crate::error::TemplateError;
use crate::marker;
use crate::value::{Handler, Value};
use crate::{debug, trace, warning};

/// One tracked attribute of an [`AttributePart`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    /// The attribute value as it was in the compiled markup.
    pub base: String,
    /// Slot indices in the order their markers appear in `base`.
    pub indices: Vec<usize>,
    /// The attribute name without bracket decoration.
    pub clean_name: String,
    /// Whether the value is written as a property instead of an attribute.
    pub property: bool,
}

impl AttributeBinding {
    fn new(name: &str, base: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            base: base.to_owned(),
            indices: marker::indices(base)?,
            clean_name: marker::clean_name(name),
            property: marker::is_property_binding(name),
        })
    }
}

/// What one attribute resolves to for a given value sequence.
enum Resolved<C> {
    Text(String),
    Event(Handler<C>),
}

/// The dynamic attributes of one element.
///
/// An attribute is tracked when its value contains a marker or its name is
/// in bracket notation. When a slot feeding an attribute holds a handler the
/// attribute turns into an event listener on the element and stops being
/// tracked.
pub struct AttributePart<C> {
    element: NodeId,
    bindings: IndexMap<String, AttributeBinding>,
    context: Option<Weak<C>>,
}

impl<C: 'static> AttributePart<C> {
    /// Collect the bound attributes of `element`, or `None` if it has none.
    pub(crate) fn discover(doc: &Document, element: NodeId) -> Result<Option<Self>, TemplateError> {
        let mut bindings = IndexMap::new();
        for (name, value) in doc.attributes(element)? {
            if marker::is_marker(value) || marker::is_property_binding(name) {
                bindings.insert(name.clone(), AttributeBinding::new(name, value)?);
            }
        }
        if bindings.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            element,
            bindings,
            context: None,
        }))
    }

    /// The bound element.
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Tracked attributes by original name, in document order.
    pub fn bindings(&self) -> &IndexMap<String, AttributeBinding> {
        &self.bindings
    }

    /// Every slot index referenced by a tracked attribute.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bindings.values().flat_map(|b| b.indices.iter().copied())
    }

    /// Bind the context that event handlers will receive.
    pub fn init(&mut self, context: &Rc<C>) {
        self.context = Some(Rc::downgrade(context));
    }

    /// Re-derive every tracked attribute from its base value.
    pub fn update(&mut self, doc: &mut Document, values: &[Value<C>]) -> Result<(), TemplateError> {
        let resolved: Vec<(String, Resolved<C>)> = self
            .bindings
            .iter()
            .map(|(name, binding)| (name.clone(), resolve(binding, values)))
            .collect();

        for (name, outcome) in resolved {
            match outcome {
                Resolved::Text(text) => self.write(doc, &name, text)?,
                Resolved::Event(handler) => self.bind_event(doc, &name, handler)?,
            }
        }
        Ok(())
    }

    fn write(&self, doc: &mut Document, name: &str, text: String) -> Result<(), TemplateError> {
        let Some(binding) = self.bindings.get(name) else {
            return Ok(());
        };
        if binding.property {
            trace!(element = ?self.element, name = %binding.clean_name, %text, "property update");
            doc.set_property(self.element, binding.clean_name.as_str(), text)?;
            doc.remove_attribute(self.element, name)?;
        } else {
            trace!(element = ?self.element, %name, %text, "attribute update");
            doc.set_attribute(self.element, name, text)?;
        }
        Ok(())
    }

    fn bind_event(
        &mut self,
        doc: &mut Document,
        name: &str,
        handler: Handler<C>,
    ) -> Result<(), TemplateError> {
        let Some(context) = self.context.clone() else {
            warning!(element = ?self.element, %name, "event binding before init, skipped");
            return Ok(());
        };
        let kind = marker::event_name(name);
        debug!(element = ?self.element, %kind, "converting attribute to listener");
        let listener: Listener = Rc::new(move |doc: &mut Document, event: &Event| {
            if let Some(context) = context.upgrade() {
                handler.call(&context, doc, event);
            }
        });
        doc.add_event_listener(self.element, kind, listener)?;
        doc.remove_attribute(self.element, name)?;
        self.bindings.shift_remove(name);
        Ok(())
    }
}

/// A handler in any feeding slot wins. Otherwise every marker in the base
/// value is replaced in one pass, so inserted text is never rescanned.
fn resolve<C>(binding: &AttributeBinding, values: &[Value<C>]) -> Resolved<C> {
    let handler = binding
        .indices
        .iter()
        .find_map(|&index| values.get(index)?.as_handler());
    if let Some(handler) = handler {
        return Resolved::Event(handler.clone());
    }
    Resolved::Text(marker::substitute(&binding.base, |index| {
        values.get(index).map(Value::to_text_or_empty).unwrap_or_default()
    }))
}

impl<C> fmt::Debug for AttributePart<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributePart")
            .field("element", &self.element)
            .field("bindings", &self.bindings)
            .field("initialized", &self.context.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::marker::encode;

    struct Counter(Cell<u32>);

    fn element_with(doc: &mut Document, attrs: &[(&str, String)]) -> NodeId {
        let el = doc.create_element("input");
        for (name, value) in attrs {
            doc.set_attribute(el, *name, value.as_str()).unwrap();
        }
        el
    }

    #[test]
    fn test_plain_attributes_are_not_tracked() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("type", "text".into())]);
        assert!(AttributePart::<()>::discover(&doc, el).unwrap().is_none());
    }

    #[test]
    fn test_discovery_records_binding_shape() {
        let mut doc = Document::new();
        let el = element_with(
            &mut doc,
            &[
                ("type", "text".into()),
                ("class", format!("a {} b {}", encode(1), encode(0))),
                ("[value]", encode(2)),
            ],
        );
        let part = AttributePart::<()>::discover(&doc, el).unwrap().unwrap();
        let names: Vec<_> = part.bindings().keys().cloned().collect();
        assert_eq!(names, vec!["class", "[value]"]);
        assert_eq!(part.bindings()["class"].indices, vec![1, 0]);
        assert_eq!(part.bindings()["[value]"].clean_name, "value");
        assert!(part.bindings()["[value]"].property);
        assert_eq!(part.indices().collect::<Vec<_>>(), vec![1, 0, 2]);
    }

    #[test]
    fn test_falsy_values_substitute_empty() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("title", format!("{}|{}|{}", encode(0), encode(1), encode(2)))]);
        let mut part = AttributePart::<()>::discover(&doc, el).unwrap().unwrap();
        part.update(&mut doc, &[Value::from(false), Value::from(0), Value::from("ok")])
            .unwrap();
        assert_eq!(doc.attribute(el, "title"), Some("||ok"));
    }

    #[test]
    fn test_repeated_slot_fills_every_occurrence() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("title", format!("{}-{}", encode(0), encode(0)))]);
        let mut part = AttributePart::<()>::discover(&doc, el).unwrap().unwrap();
        part.update(&mut doc, &[Value::from("x")]).unwrap();
        assert_eq!(doc.attribute(el, "title"), Some("x-x"));
    }

    #[test]
    fn test_marker_text_inside_a_value_is_left_alone() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("title", format!("{}|{}", encode(0), encode(1)))]);
        let mut part = AttributePart::<()>::discover(&doc, el).unwrap().unwrap();
        part.update(&mut doc, &[Value::from(encode(1)), Value::from("B")])
            .unwrap();
        assert_eq!(doc.attribute(el, "title"), Some("---!{1}!---|B"));

        part.update(&mut doc, &[Value::from("A"), Value::from(encode(0))])
            .unwrap();
        assert_eq!(doc.attribute(el, "title"), Some("A|---!{0}!---"));
    }

    #[test]
    fn test_property_binding_writes_property() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("[value]", encode(0))]);
        let mut part = AttributePart::<()>::discover(&doc, el).unwrap().unwrap();
        part.update(&mut doc, &[Value::from("typed")]).unwrap();
        assert_eq!(doc.property(el, "value"), Some("typed"));
        assert_eq!(doc.attribute(el, "[value]"), None);

        part.update(&mut doc, &[Value::from("again")]).unwrap();
        assert_eq!(doc.property(el, "value"), Some("again"));
    }

    #[test]
    fn test_handler_becomes_listener_once() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("@click", encode(0))]);
        let context = Rc::new(Counter(Cell::new(0)));
        let mut part = AttributePart::discover(&doc, el).unwrap().unwrap();
        part.init(&context);

        let values = vec![Value::handler(|c: &Counter, _: &mut Document, _: &Event| {
            c.0.set(c.0.get() + 1)
        })];
        part.update(&mut doc, &values).unwrap();
        part.update(&mut doc, &values).unwrap();

        assert_eq!(doc.attribute(el, "@click"), None);
        assert!(part.bindings().is_empty());
        assert_eq!(doc.listener_count(el, "click"), 1);

        doc.dispatch_event(Event::new("click", el)).unwrap();
        assert_eq!(context.0.get(), 1);
    }

    #[test]
    fn test_listener_is_inert_after_context_drops() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("@click", encode(0))]);
        let context = Rc::new(Counter(Cell::new(0)));
        let mut part = AttributePart::discover(&doc, el).unwrap().unwrap();
        part.init(&context);
        part.update(
            &mut doc,
            &[Value::handler(|c: &Counter, _: &mut Document, _: &Event| {
                c.0.set(c.0.get() + 1)
            })],
        )
        .unwrap();

        drop(context);
        assert_eq!(doc.dispatch_event(Event::new("click", el)).unwrap(), 1);
    }

    #[test]
    fn test_handler_without_context_stays_tracked() {
        let mut doc = Document::new();
        let el = element_with(&mut doc, &[("@click", encode(0))]);
        let mut part = AttributePart::<Counter>::discover(&doc, el).unwrap().unwrap();
        part.update(&mut doc, &[Value::handler(|_, _, _| {})]).unwrap();
        assert_eq!(doc.listener_count(el, "click"), 0);
        assert!(part.bindings().contains_key("@click"));
    }
}
