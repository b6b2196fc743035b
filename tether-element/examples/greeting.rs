//! A component with one bound attribute and a button that toggles it.
//!
//! Run with `cargo run -p tether-element --example greeting`.

use tether::{Document, Event, Template, Value, html};
use tether_element::{BoundAttribute, Coercion, Component, ElementError, Host};

struct Greeting;

impl Greeting {
    fn change_whatever(host: &Host<Self>, doc: &mut Document, _: &Event) {
        let next = match host.get(doc, "whatever") {
            Ok(Value::Text(current)) if current == "world" => "y'all",
            _ => "world",
        };
        if let Err(e) = host.set(doc, "whatever", next) {
            tracing::warn!(error = %e, "could not update greeting");
        }
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

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut doc = Document::new();
    let body = doc.create_element("body");
    let host = Host::new(&mut doc, Greeting)?;
    doc.append_child(body, host.node())?;
    host.connect(&mut doc)?;
    println!("{}", doc.inner_html(body)?);

    let button = doc
        .last_child(host.node())
        .ok_or("greeting rendered no button")?;
    for _ in 0..2 {
        doc.dispatch_event(Event::new("click", button))?;
        println!("{}", doc.inner_html(body)?);
    }
    Ok(())
}
