//! Compiling, rendering and updating a template.

use core::fmt;
use std::collections::BTreeSet;
use std::rc::Rc;

use tether_dom::{Document, NodeData, NodeId, TreeWalker, WhatToShow};

use crate::error::TemplateError;
use crate::marker;
use crate::part::{AttributePart, ContentPart, Part, PartRegistry};
use crate::value::Value;
use crate::{debug, trace, warning};

/// Whatever a template renders for.
///
/// Event handlers found in attribute slots receive the context as their
/// receiver. When no mount point is given to [`Template::render`], the
/// context's host node is used.
pub trait RenderContext {
    /// The node the template mounts under by default.
    fn host(&self) -> NodeId;
}

/// Where a template is in its lifecycle. Each stage carries what the earlier
/// ones produced, so nothing is ever computed twice.
enum Stage<C> {
    Uncompiled,
    Compiled {
        markup: Rc<str>,
    },
    Materialized {
        markup: Rc<str>,
        fragment: NodeId,
    },
    Rendered {
        markup: Rc<str>,
        parts: Vec<Part<C>>,
        registry: PartRegistry,
        mount: NodeId,
    },
}

impl<C> Stage<C> {
    fn name(&self) -> &'static str {
        match self {
            Stage::Uncompiled => "uncompiled",
            Stage::Compiled { .. } => "compiled",
            Stage::Materialized { .. } => "materialized",
            Stage::Rendered { .. } => "rendered",
        }
    }

    fn markup(&self) -> Option<&Rc<str>> {
        match self {
            Stage::Uncompiled => None,
            Stage::Compiled { markup }
            | Stage::Materialized { markup, .. }
            | Stage::Rendered { markup, .. } => Some(markup),
        }
    }
}

/// A markup template: static strings with value slots between them.
///
/// Build one with [`html`](crate::html), [`render`](Template::render) it once,
/// then feed it new values with [`update`](Template::update). The tree is
/// built once and every update rewrites the same nodes in place.
pub struct Template<C> {
    strings: Vec<String>,
    values: Vec<Value<C>>,
    previous: Option<Vec<Value<C>>>,
    slots: usize,
    stage: Stage<C>,
}

impl<C> Template<C> {
    /// Create a template from its static strings and initial values.
    ///
    /// The value at position `i` is placed right after `strings[i]`. Values
    /// with no matching string are never placed.
    pub fn new<S>(strings: impl IntoIterator<Item = S>, values: Vec<Value<C>>) -> Self
    where
        S: Into<String>,
    {
        let slots = values.len();
        Self {
            strings: strings.into_iter().map(Into::into).collect(),
            values,
            previous: None,
            slots,
            stage: Stage::Uncompiled,
        }
    }

    /// Produce the marker-annotated markup.
    ///
    /// The first call builds it; every later call returns the same
    /// allocation.
    pub fn compile(&mut self) -> Rc<str> {
        if let Some(markup) = self.stage.markup() {
            return markup.clone();
        }
        let markup: Rc<str> = annotate(&self.strings, &self.values).into();
        debug!(slots = self.slots, len = markup.len(), "compiled template");
        self.stage = Stage::Compiled {
            markup: markup.clone(),
        };
        markup
    }

    /// Parse the compiled markup into a detached fragment of `doc`.
    ///
    /// Cached like [`compile`](Template::compile).
    pub fn materialize(&mut self, doc: &mut Document) -> Result<NodeId, TemplateError> {
        let markup = self.compile();
        match &self.stage {
            Stage::Materialized { fragment, .. } => return Ok(*fragment),
            Stage::Rendered { .. } => return Err(TemplateError::AlreadyRendered),
            Stage::Uncompiled | Stage::Compiled { .. } => {}
        }
        let fragment = doc.parse_fragment(&markup)?;
        trace!(?fragment, "materialized template");
        self.stage = Stage::Materialized { markup, fragment };
        Ok(fragment)
    }

    /// Replace the values and rewrite every part.
    ///
    /// `values` may be shorter or longer than the slot count. Missing slots
    /// substitute as empty text and extra values are ignored.
    pub fn update(&mut self, doc: &mut Document, values: Vec<Value<C>>) -> Result<(), TemplateError>
    where
        C: 'static,
    {
        let Stage::Rendered { parts, .. } = &mut self.stage else {
            return Err(TemplateError::NotRendered);
        };
        self.previous = Some(core::mem::replace(&mut self.values, values));
        debug!(values = self.values.len(), parts = parts.len(), "updating template");
        for part in parts.iter_mut() {
            part.update(doc, &self.values)?;
        }
        Ok(())
    }

    /// Replace the values but only rewrite the parts that read `changed`.
    ///
    /// Parts reading other slots keep what they last rendered even if their
    /// values differ in `values`.
    pub fn update_slots(
        &mut self,
        doc: &mut Document,
        values: Vec<Value<C>>,
        changed: &[usize],
    ) -> Result<(), TemplateError>
    where
        C: 'static,
    {
        let Stage::Rendered {
            parts, registry, ..
        } = &mut self.stage
        else {
            return Err(TemplateError::NotRendered);
        };
        self.previous = Some(core::mem::replace(&mut self.values, values));
        let targets: BTreeSet<usize> = changed
            .iter()
            .flat_map(|slot| registry.parts_for(*slot).iter().copied())
            .collect();
        debug!(slots = changed.len(), parts = targets.len(), "sparse template update");
        for position in targets {
            if let Some(part) = parts.get_mut(position) {
                part.update(doc, &self.values)?;
            }
        }
        Ok(())
    }

    /// The current values.
    pub fn values(&self) -> &[Value<C>] {
        &self.values
    }

    /// The values replaced by the last update, if there was one.
    pub fn previous_values(&self) -> Option<&[Value<C>]> {
        self.previous.as_deref()
    }

    /// Consume the template, keeping only its current values.
    pub fn into_values(self) -> Vec<Value<C>> {
        self.values
    }

    /// The number of slots, fixed when the template was created.
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// The compiled markup, if [`compile`](Template::compile) has run.
    pub fn markup(&self) -> Option<&str> {
        self.stage.markup().map(|m| &**m)
    }

    /// True once [`render`](Template::render) has succeeded.
    pub fn is_rendered(&self) -> bool {
        matches!(self.stage, Stage::Rendered { .. })
    }

    /// The discovered parts, in document order. Empty before render.
    pub fn parts(&self) -> &[Part<C>] {
        match &self.stage {
            Stage::Rendered { parts, .. } => parts,
            _ => &[],
        }
    }

    /// Which parts read which slot. `None` before render.
    pub fn registry(&self) -> Option<&PartRegistry> {
        match &self.stage {
            Stage::Rendered { registry, .. } => Some(registry),
            _ => None,
        }
    }

    /// The node the template was mounted under. `None` before render.
    pub fn mount(&self) -> Option<NodeId> {
        match &self.stage {
            Stage::Rendered { mount, .. } => Some(*mount),
            _ => None,
        }
    }
}

impl<C: RenderContext + 'static> Template<C> {
    /// Build the tree, bind it to `context` and attach it.
    ///
    /// The tree goes under `mount`, or under the context's host when `mount`
    /// is `None`. If the mount point has a shadow root the tree goes there
    /// instead. A template renders exactly once.
    ///
    /// When the compiled markup contains a marker that does not name one of
    /// this template's slots, or a part fails its first write, the detached
    /// tree is dropped and the template goes back to its compiled state.
    pub fn render(
        &mut self,
        doc: &mut Document,
        context: &Rc<C>,
        mount: Option<NodeId>,
    ) -> Result<(), TemplateError> {
        if self.is_rendered() {
            return Err(TemplateError::AlreadyRendered);
        }
        let fragment = self.materialize(doc)?;
        let markup = self.compile();

        let bound = discover(doc, fragment, self.slots).and_then(|(parts, registry)| {
            Ok((bind(doc, context, &self.values, parts)?, registry))
        });
        let (parts, registry) = match bound {
            Ok(found) => found,
            Err(e) => return self.discard(doc, fragment, markup, e),
        };

        let mount = mount.unwrap_or_else(|| context.host());
        let target = doc.shadow_root(mount).unwrap_or(mount);
        doc.append_child(target, fragment)?;
        doc.remove(fragment)?;
        debug!(?mount, parts = parts.len(), "rendered template");

        self.stage = Stage::Rendered {
            markup,
            parts,
            registry,
            mount,
        };
        Ok(())
    }
}

impl<C> Template<C> {
    /// Drop a materialized tree that could not be rendered and fall back to
    /// the compiled stage, so a later render starts from the markup.
    fn discard(
        &mut self,
        doc: &mut Document,
        fragment: NodeId,
        markup: Rc<str>,
        error: TemplateError,
    ) -> Result<(), TemplateError> {
        warning!(error = %error, "discarding template tree");
        self.stage = Stage::Compiled { markup };
        doc.remove(fragment)?;
        Err(error)
    }
}

impl<C> fmt::Debug for Template<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("stage", &self.stage.name())
            .field("strings", &self.strings)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

/// Interleave the static strings with one marker per slot. A slot holding
/// `Undefined` gets a comment anchor instead of an inline marker.
fn annotate<C>(strings: &[String], values: &[Value<C>]) -> String {
    let mut markup = String::new();
    for (i, s) in strings.iter().enumerate() {
        markup.push_str(s);
        match values.get(i) {
            Some(value) if value.is_undefined() => markup.push_str(&marker::encode_anchor(i)),
            Some(_) => markup.push_str(&marker::encode(i)),
            None => {}
        }
    }
    markup
}

/// Walk `root` once and collect its parts.
fn discover<C: 'static>(
    doc: &Document,
    root: NodeId,
    slots: usize,
) -> Result<(Vec<Part<C>>, PartRegistry), TemplateError> {
    let mut parts = Vec::new();
    let mut registry = PartRegistry::default();
    let show = WhatToShow::ELEMENT | WhatToShow::TEXT | WhatToShow::COMMENT;

    for node in TreeWalker::new(doc, root, show) {
        let part = match doc.get(node)? {
            NodeData::Element(_) => match AttributePart::discover(doc, node)? {
                Some(part) => Part::Attribute(part),
                None => continue,
            },
            NodeData::Text(text) if marker::is_marker(text) => {
                Part::Content(ContentPart::new(doc, node)?)
            }
            _ => continue,
        };
        let position = parts.len();
        for index in part.indices() {
            if index >= slots {
                return Err(TemplateError::SlotOutOfRange { index, slots });
            }
            registry.register(index, position);
        }
        parts.push(part);
    }

    trace!(parts = parts.len(), "discovered parts");
    Ok((parts, registry))
}

/// Hand every part its context and write the first values.
fn bind<C: 'static>(
    doc: &mut Document,
    context: &Rc<C>,
    values: &[Value<C>],
    mut parts: Vec<Part<C>>,
) -> Result<Vec<Part<C>>, TemplateError> {
    for part in &mut parts {
        part.init(context);
        part.update(doc, values)?;
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use tether_dom::DomError;

    use super::*;

    struct Ctx(NodeId);

    impl RenderContext for Ctx {
        fn host(&self) -> NodeId {
            self.0
        }
    }

    #[test]
    fn test_annotate_interleaves_markers() {
        let values: Vec<Value<()>> = vec![Value::from("a"), Value::Undefined];
        let strings = vec!["<p>".to_string(), "</p><p>".into(), "</p>".into()];
        assert_eq!(
            annotate(&strings, &values),
            "<p>---!{0}!---</p><p><!-- ---!{1}!--- --></p>"
        );
    }

    #[test]
    fn test_annotate_follows_strings_not_gaps() {
        let values: Vec<Value<()>> = vec![Value::from(1), Value::from(2)];
        let strings = vec!["<p>".to_string(), "</p>".into()];
        assert_eq!(annotate(&strings, &values), "<p>---!{0}!---</p>---!{1}!---");
    }

    #[test]
    fn test_materialize_is_cached() {
        let mut doc = Document::new();
        let mut t = Template::<Ctx>::new(["<b>", "</b>"], vec![Value::from(1)]);
        let a = t.materialize(&mut doc).unwrap();
        let b = t.materialize(&mut doc).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_discover_skips_comments_and_plain_nodes() {
        let mut doc = Document::new();
        let fragment = doc
            .parse_fragment("<div id=\"x\">plain<!-- ---!{0}!--- --><i>---!{1}!---</i></div>")
            .unwrap();
        let (parts, registry) = discover::<Ctx>(&doc, fragment, 2).unwrap();
        assert_eq!(parts.len(), 1);
        assert!(matches!(parts[0], Part::Content(_)));
        assert_eq!(registry.parts_for(1), &[0]);
        assert!(registry.parts_for(0).is_empty());
    }

    #[test]
    fn test_failed_first_write_falls_back_to_compiled() {
        let mut doc = Document::new();
        let host = doc.create_element("div");
        let ctx = Rc::new(Ctx(host));
        let mut t = Template::new(["<p>", "</p>"], vec![Value::from("x")]);
        let fragment = t.materialize(&mut doc).unwrap();
        let markup = t.compile();

        let (parts, _) = discover::<Ctx>(&doc, fragment, 1).unwrap();
        let text = parts[0].node();
        doc.remove(text).unwrap();
        let err = bind(&mut doc, &ctx, &t.values, parts).unwrap_err();
        assert_eq!(err, TemplateError::Dom(DomError::UnknownNode(text)));

        assert_eq!(t.discard(&mut doc, fragment, markup, err.clone()), Err(err));
        assert_eq!(t.stage.name(), "compiled");
        assert!(!doc.contains(fragment));

        t.render(&mut doc, &ctx, None).unwrap();
        assert_eq!(doc.inner_html(host).unwrap(), "<p>x</p>");
    }

    #[test]
    fn test_stage_names() {
        let mut doc = Document::new();
        let host = doc.create_element("div");
        let mut t = Template::new(["x"], Vec::new());
        assert_eq!(t.stage.name(), "uncompiled");
        t.compile();
        assert_eq!(t.stage.name(), "compiled");
        t.materialize(&mut doc).unwrap();
        assert_eq!(t.stage.name(), "materialized");
        t.render(&mut doc, &Rc::new(Ctx(host)), None).unwrap();
        assert_eq!(t.stage.name(), "rendered");
    }
}
