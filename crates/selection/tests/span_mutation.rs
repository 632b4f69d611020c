mod common;

use common::fixture;
use dom::{BoundaryRange, NativeRange, Position, RangeApi};
use selection::{SelectionError, SelectionManager, Span};

#[test]
fn wrap_with_em_keeps_content_and_selects_wrapper() {
    let mut f = fixture(RangeApi::Standard);
    let mut manager = SelectionManager::new();
    let range = BoundaryRange::new(Position::new(f.one, 0), Position::new(f.one, 3));
    manager.select(&mut f.window, NativeRange::from(range)).unwrap();
    let before = manager.get_html(&f.window).unwrap();

    let wrapper = manager.wrap_with(&mut f.window, "em").unwrap();
    let doc = f.window.document();
    assert_eq!(doc.element_name(wrapper), Some("em"));
    assert_eq!(doc.inner_html(wrapper), before);
    assert_eq!(doc.inner_html(f.p), "<em>one</em> <em>two</em> three");

    let whole = Span::from_node(doc, RangeApi::Standard, wrapper, false).unwrap();
    assert!(manager.equals(&f.window, &whole));

    manager.select_inside(&mut f.window, wrapper).unwrap();
    let inside = Span::from_node(f.window.document(), RangeApi::Standard, wrapper, true).unwrap();
    assert!(manager.get_range(&f.window).equals(&inside));
    assert_eq!(manager.get_html(&f.window).unwrap(), before);
}

#[test]
fn wrap_with_existing_node() {
    let mut f = fixture(RangeApi::Standard);
    let mut manager = SelectionManager::new();
    manager.select_inside(&mut f.window, f.p2).unwrap();
    let mark = f.window.document_mut().create_element("mark");
    let wrapper = manager.wrap_with(&mut f.window, mark).unwrap();
    assert_eq!(wrapper, mark);
    assert_eq!(f.window.document().inner_html(f.p2), "<mark>four</mark>");
}

#[test]
fn replace_collapsed_selection_with_text() {
    let mut f = fixture(RangeApi::Standard);
    let mut manager = SelectionManager::new();
    let at = BoundaryRange::collapsed_at(Position::new(f.four, 4));
    manager.select(&mut f.window, NativeRange::from(at)).unwrap();

    let inserted = manager.replace_with(&mut f.window, "hello").unwrap();
    let doc = f.window.document();
    let fresh = Span::from_node(doc, RangeApi::Standard, inserted, true).unwrap();
    assert_eq!(fresh.get_text(doc).unwrap(), "hello");
    assert_eq!(doc.text_content(f.p2), "fourhello");

    assert!(manager.is_collapsed(&f.window).unwrap());
    let after = Span::new(BoundaryRange::collapsed_at(Position::new(f.p2, 2)).into());
    assert!(manager.equals(&f.window, &after));
}

#[test]
fn replace_range_selects_the_new_content() {
    let mut f = fixture(RangeApi::Standard);
    let mut manager = SelectionManager::new();
    manager.select_inside(&mut f.window, f.em).unwrap();
    manager.replace_with(&mut f.window, "2").unwrap();
    assert_eq!(f.window.document().text_content(f.p), "one 2 three");
    assert_eq!(manager.get_text(&f.window).unwrap(), "2");
    assert!(!manager.is_collapsed(&f.window).unwrap());
}

#[test]
fn replace_fragment_content() {
    let mut f = fixture(RangeApi::Standard);
    let mut manager = SelectionManager::new();
    manager.select_inside(&mut f.window, f.li1).unwrap();
    let fragment = manager.clone_contents(&mut f.window).unwrap();
    manager.select_inside(&mut f.window, f.li2).unwrap();
    manager.replace_with(&mut f.window, fragment).unwrap();

    let doc = f.window.document();
    assert_eq!(doc.inner_html(f.ul), "<li>x</li><li>x</li>");
    assert_eq!(doc.child_count(fragment), 0);
    assert_eq!(manager.get_text(&f.window).unwrap(), "x");
}

#[test]
fn legacy_replace_splices_through_placeholder() {
    let mut f = fixture(RangeApi::Legacy);
    let mut manager = SelectionManager::new();
    manager.select_inside(&mut f.window, f.em).unwrap();
    manager.replace_with(&mut f.window, "2").unwrap();

    let doc = f.window.document();
    assert_eq!(doc.inner_html(f.p), "one <em>2</em> three");
    assert_eq!(doc.element_by_id(selection::PLACEHOLDER_ID), None);
    assert_eq!(manager.get_text(&f.window).unwrap(), "2");
}

#[test]
fn legacy_wrap_stays_inside_the_selected_element() {
    let mut f = fixture(RangeApi::Legacy);
    let mut manager = SelectionManager::new();
    manager.select_inside(&mut f.window, f.p2).unwrap();
    let fragment = manager.clone_contents(&mut f.window).unwrap();
    assert_eq!(f.window.document().inner_html(fragment), "four");

    let wrapper = manager.wrap_with(&mut f.window, "b").unwrap();
    let doc = f.window.document();
    assert_eq!(
        doc.inner_html(f.div),
        "<p>one <em>two</em> three</p><p><b>four</b></p>"
    );
    assert_eq!(doc.parent(wrapper), Some(f.p2));
    assert_eq!(manager.get_text(&f.window).unwrap(), "four");
    assert_eq!(manager.containing_node(&f.window), Some(wrapper));
}

#[test]
fn legacy_collapsed_replace_lands_after_content() {
    let mut f = fixture(RangeApi::Legacy);
    let mut manager = SelectionManager::new();
    manager.select_inside(&mut f.window, f.p2).unwrap();
    manager.collapse(&mut f.window, false).unwrap();
    manager.replace_with(&mut f.window, "!").unwrap();

    assert_eq!(f.window.document().text_content(f.p2), "four!");
    assert!(manager.is_collapsed(&f.window).unwrap());
    let NativeRange::LegacyText(range) = manager.get_range(&f.window).into_native() else {
        panic!("expected a legacy text range");
    };
    assert_eq!(range.start(), 18);
}

#[test]
fn clone_contents_leaves_the_tree_alone() {
    let mut f = fixture(RangeApi::Standard);
    let mut manager = SelectionManager::new();
    let range = BoundaryRange::new(Position::new(f.one, 2), Position::new(f.two, 1));
    manager.select(&mut f.window, NativeRange::from(range)).unwrap();
    let before = f.window.document().outer_html(f.div);

    let fragment = manager.clone_contents(&mut f.window).unwrap();
    let doc = f.window.document();
    assert_eq!(doc.inner_html(fragment), "e <em>t</em>");
    assert_eq!(doc.outer_html(f.div), before);
}

#[test]
fn item_selection_rejects_text_operations() {
    let mut f = fixture(RangeApi::Legacy);
    let mut manager = SelectionManager::new();
    let items = NativeRange::LegacyItem(dom::ItemRange::new(vec![f.em]));
    manager.select(&mut f.window, items).unwrap();

    assert!(matches!(
        manager.get_text(&f.window),
        Err(SelectionError::Range(dom::RangeError::Unsupported { .. }))
    ));
    assert!(manager.collapse(&mut f.window, true).is_err());
    assert!(manager.replace_with(&mut f.window, "x").is_err());
    assert_eq!(manager.containing_node(&f.window), Some(f.p));
    assert_eq!(manager.is_element(&mut f.window, true, None), Some(f.em));
}
