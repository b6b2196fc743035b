use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use tether::{Document, NodeId, RenderContext, Template, Value};

use crate::component::{BoundAttribute, Component};
use crate::error::ElementError;
use crate::{debug, trace};

/// A component instance attached to its host element.
pub struct Host<T: Component> {
    node: NodeId,
    state: T,
    template: RefCell<Option<Template<Host<T>>>>,
}

impl<T: Component> Host<T> {
    /// Create the host element and run [`Component::created`].
    ///
    /// The element is detached; append it somewhere before or after
    /// [`connect`](Host::connect) as needed.
    pub fn new(doc: &mut Document, state: T) -> Result<Rc<Self>, ElementError> {
        let host = Rc::new(Self {
            node: doc.create_element(T::TAG),
            state,
            template: RefCell::new(None),
        });
        debug!(tag = T::TAG, node = ?host.node, "created host");
        T::created(&host, doc)?;
        Ok(host)
    }

    /// The host element.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The component's own state.
    pub fn state(&self) -> &T {
        &self.state
    }

    /// Names of the bound attributes.
    pub fn observed_attributes() -> impl Iterator<Item = &'static str> {
        T::BOUND_ATTRIBUTES.iter().map(|a| a.name)
    }

    fn bound(name: &str) -> Result<&'static BoundAttribute, ElementError> {
        T::BOUND_ATTRIBUTES
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| ElementError::UnknownAttribute(name.to_owned()))
    }

    /// Read a bound attribute through its coercion.
    pub fn get(&self, doc: &Document, name: &str) -> Result<Value<Self>, ElementError> {
        let bound = Self::bound(name)?;
        Ok(bound.coercion.apply(doc.attribute(self.node, name)))
    }

    /// Write a bound attribute and re-render if connected.
    ///
    /// A truthy value sets the attribute to its display text; a falsy value
    /// removes it.
    pub fn set(
        &self,
        doc: &mut Document,
        name: &str,
        value: impl Into<Value<Self>>,
    ) -> Result<(), ElementError> {
        Self::bound(name)?;
        let value = value.into();
        if value.is_truthy() {
            doc.set_attribute(self.node, name, value.to_string())?;
        } else {
            doc.remove_attribute(self.node, name)?;
        }
        trace!(%name, %value, "bound attribute set");

        let mut slot = self
            .template
            .try_borrow_mut()
            .map_err(|_| ElementError::Reentrant)?;
        let Some(template) = slot.as_mut() else {
            return Ok(());
        };
        let values = T::render(self, doc)?.into_values();
        template.update(doc, values)?;
        Ok(())
    }

    /// Render the component into the host element and keep the template for
    /// later updates.
    pub fn connect(self: &Rc<Self>, doc: &mut Document) -> Result<(), ElementError> {
        let mut slot = self
            .template
            .try_borrow_mut()
            .map_err(|_| ElementError::Reentrant)?;
        if slot.is_some() {
            return Err(ElementError::AlreadyConnected);
        }
        let mut template = T::render(self, doc)?;
        template.render(doc, self, None)?;
        debug!(tag = T::TAG, parts = template.parts().len(), "connected host");
        *slot = Some(template);
        Ok(())
    }

    /// True once [`connect`](Host::connect) has succeeded.
    pub fn is_connected(&self) -> bool {
        self.template.try_borrow().map_or(true, |t| t.is_some())
    }
}

impl<T: Component> RenderContext for Host<T> {
    fn host(&self) -> NodeId {
        self.node
    }
}

impl<T: Component> fmt::Debug for Host<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("tag", &T::TAG)
            .field("node", &self.node)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
