#![allow(dead_code)]

use dom::{Document, NodeKey, RangeApi};
use platform::Window;

/// ```html
/// <body>
///   <div><p>one <em>two</em> three</p><p>four</p></div>
///   <ul><li>x</li><li>y</li></ul>
/// </body>
/// ```
pub struct Fixture {
    pub window: Window,
    pub div: NodeKey,
    pub p: NodeKey,
    pub one: NodeKey,
    pub em: NodeKey,
    pub two: NodeKey,
    pub p2: NodeKey,
    pub four: NodeKey,
    pub ul: NodeKey,
    pub li1: NodeKey,
    pub li2: NodeKey,
}

fn element(doc: &mut Document, parent: NodeKey, name: &str) -> NodeKey {
    let node = doc.create_element(name);
    doc.append_child(parent, node).unwrap();
    node
}

fn text(doc: &mut Document, parent: NodeKey, data: &str) -> NodeKey {
    let node = doc.create_text(data);
    doc.append_child(parent, node).unwrap();
    node
}

pub fn fixture(api: RangeApi) -> Fixture {
    let mut doc = Document::new();
    let body = doc.body();
    let div = element(&mut doc, body, "div");
    let p = element(&mut doc, div, "p");
    let one = text(&mut doc, p, "one ");
    let em = element(&mut doc, p, "em");
    let two = text(&mut doc, em, "two");
    text(&mut doc, p, " three");
    let p2 = element(&mut doc, div, "p");
    let four = text(&mut doc, p2, "four");
    let ul = element(&mut doc, body, "ul");
    let li1 = element(&mut doc, ul, "li");
    text(&mut doc, li1, "x");
    let li2 = element(&mut doc, ul, "li");
    text(&mut doc, li2, "y");

    Fixture {
        window: Window::with_document(doc, api),
        div,
        p,
        one,
        em,
        two,
        p2,
        four,
        ul,
        li1,
        li2,
    }
}
