use std::cell::Cell;

use tether::{Document, Event, Template, Value, html};
use tether_element::{BoundAttribute, Coercion, Component, ElementError, Host};
use tether_testhelpers::test;

struct Greeting;

impl Greeting {
    fn change_whatever(host: &Host<Self>, doc: &mut Document, _: &Event) {
        let next = match host.get(doc, "whatever") {
            Ok(Value::Text(current)) if current == "world" => "y'all",
            _ => "world",
        };
        host.set(doc, "whatever", next).unwrap();
    }
}

impl Component for Greeting {
    const TAG: &'static str = "test-el";
    const BOUND_ATTRIBUTES: &'static [BoundAttribute] =
        &[BoundAttribute::new("whatever", Coercion::Text)];

    fn created(host: &Host<Self>, doc: &mut Document) -> Result<(), ElementError> {
        host.set(doc, "whatever", "world")
    }

    fn render(host: &Host<Self>, doc: &Document) -> Result<Template<Host<Self>>, ElementError> {
        Ok(html(
            &[
                "<h1>Hello ",
                "</h1>\n<button @click=\"",
                "\">Change whatever</button>",
            ],
            vec![
                host.get(doc, "whatever")?,
                Value::handler(Greeting::change_whatever),
            ],
        ))
    }
}

fn click(doc: &mut Document, host: &Host<Greeting>) {
    let button = doc.last_child(host.node()).unwrap();
    doc.dispatch_event(Event::new("click", button)).unwrap();
}

#[test]
fn created_hook_sets_the_attribute() {
    let mut doc = Document::new();
    let host = Host::new(&mut doc, Greeting).unwrap();
    assert_eq!(doc.attribute(host.node(), "whatever"), Some("world"));
    assert!(!host.is_connected());
    assert_eq!(doc.children(host.node()).count(), 0);
}

#[test]
fn click_toggles_the_greeting() {
    let mut doc = Document::new();
    let host = Host::new(&mut doc, Greeting).unwrap();
    host.connect(&mut doc).unwrap();

    insta::assert_snapshot!(doc.to_html(host.node()).unwrap(), @r#"
    <test-el whatever="world"><h1>Hello world</h1>
    <button>Change whatever</button></test-el>
    "#);

    let h1 = doc.first_child(host.node()).unwrap();
    let text = doc.first_child(h1).unwrap();

    click(&mut doc, &host);
    assert_eq!(doc.text(text), Some("Hello y'all"));
    assert_eq!(doc.attribute(host.node(), "whatever"), Some("y'all"));

    click(&mut doc, &host);
    assert_eq!(doc.text(text), Some("Hello world"));
}

#[test]
fn repeated_renders_keep_one_listener() {
    let mut doc = Document::new();
    let host = Host::new(&mut doc, Greeting).unwrap();
    host.connect(&mut doc).unwrap();
    for _ in 0..3 {
        click(&mut doc, &host);
    }
    let button = doc.last_child(host.node()).unwrap();
    assert_eq!(doc.listener_count(button, "click"), 1);
    assert_eq!(doc.attribute(host.node(), "whatever"), Some("y'all"));
}

#[test]
fn falsy_set_removes_the_attribute() {
    let mut doc = Document::new();
    let host = Host::new(&mut doc, Greeting).unwrap();
    host.connect(&mut doc).unwrap();

    host.set(&mut doc, "whatever", "").unwrap();
    assert_eq!(doc.attribute(host.node(), "whatever"), None);
    let h1 = doc.first_child(host.node()).unwrap();
    assert_eq!(doc.to_html(h1).unwrap(), "<h1>Hello </h1>");
}

#[test]
fn unknown_attribute_is_rejected() {
    let mut doc = Document::new();
    let host = Host::new(&mut doc, Greeting).unwrap();
    assert_eq!(
        host.set(&mut doc, "nope", "x"),
        Err(ElementError::UnknownAttribute("nope".into()))
    );
    assert_eq!(
        host.get(&doc, "nope"),
        Err(ElementError::UnknownAttribute("nope".into()))
    );
}

#[test]
fn connect_twice_fails() {
    let mut doc = Document::new();
    let host = Host::new(&mut doc, Greeting).unwrap();
    host.connect(&mut doc).unwrap();
    assert_eq!(host.connect(&mut doc), Err(ElementError::AlreadyConnected));
}

#[test]
fn observed_attributes_come_from_the_table() {
    let names: Vec<_> = Host::<Greeting>::observed_attributes().collect();
    assert_eq!(names, vec!["whatever"]);
}

struct Counter {
    renders: Cell<u32>,
}

impl Component for Counter {
    const TAG: &'static str = "x-counter";
    const BOUND_ATTRIBUTES: &'static [BoundAttribute] = &[
        BoundAttribute::new("count", Coercion::Number),
        BoundAttribute::new("open", Coercion::Boolean),
    ];

    fn render(host: &Host<Self>, doc: &Document) -> Result<Template<Host<Self>>, ElementError> {
        let renders = &host.state().renders;
        renders.set(renders.get() + 1);
        let open = host.get(doc, "open")?;
        Ok(html(
            &["<span data-open=\"", "\">", "</span>"],
            vec![open, host.get(doc, "count")?],
        ))
    }
}

#[test]
fn coerced_values_flow_into_the_template() {
    let mut doc = Document::new();
    let host = Host::new(
        &mut doc,
        Counter {
            renders: Cell::new(0),
        },
    )
    .unwrap();
    let root = doc.attach_shadow(host.node()).unwrap();

    host.set(&mut doc, "count", 2).unwrap();
    assert_eq!(host.state().renders.get(), 0);

    host.connect(&mut doc).unwrap();
    assert_eq!(
        doc.inner_html(root).unwrap(),
        r#"<span data-open="">2</span>"#
    );

    host.set(&mut doc, "open", true).unwrap();
    host.set(&mut doc, "count", 2.5).unwrap();
    assert_eq!(host.get(&doc, "count"), Ok(Value::Float(2.5)));
    assert_eq!(
        doc.inner_html(root).unwrap(),
        r#"<span data-open="true">2.5</span>"#
    );
    assert_eq!(host.state().renders.get(), 3);
}

#[test]
fn dropped_host_leaves_inert_listeners() {
    let mut doc = Document::new();
    let host = Host::new(&mut doc, Greeting).unwrap();
    host.connect(&mut doc).unwrap();
    let button = doc.last_child(host.node()).unwrap();
    let node = host.node();

    drop(host);
    assert_eq!(doc.dispatch_event(Event::new("click", button)).unwrap(), 1);
    assert_eq!(doc.attribute(node, "whatever"), Some("world"));
}
