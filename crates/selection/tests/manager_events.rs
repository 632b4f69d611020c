mod common;

use common::{Fixture, fixture};
use dom::{NodeKey, RangeApi};
use platform::{InputEvent, InputKind, ManualClock, Window};
use selection::{
    Listener, MissingEvents, SelectionConfig, SelectionError, SelectionEvent, SelectionManager,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type Log = Rc<RefCell<Vec<String>>>;

fn recorder(log: &Log, tag: &'static str) -> Listener {
    let log = Rc::clone(log);
    Rc::new(
        move |_: &mut SelectionManager, _: &mut Window, _: &SelectionEvent| {
            log.borrow_mut().push(tag.to_string());
        },
    )
}

fn stopper(log: &Log, tag: &'static str) -> Listener {
    let log = Rc::clone(log);
    Rc::new(
        move |_: &mut SelectionManager, _: &mut Window, event: &SelectionEvent| {
            log.borrow_mut().push(tag.to_string());
            event.stop_propagation();
        },
    )
}

fn at(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn setup(config: SelectionConfig) -> (Fixture, SelectionManager, ManualClock) {
    let clock = ManualClock::new();
    clock.set(at(1_000));
    let manager = SelectionManager::with_config(config).with_clock(clock.clone());
    (fixture(RangeApi::Standard), manager, clock)
}

// The user drags over `node`'s content; the host updates its selection
// without going through the manager.
fn user_selects(window: &mut Window, node: NodeKey) {
    let range = window.create_native_range(node, true).unwrap();
    window.set_selection(&range);
}

fn mouse_up(target: NodeKey) -> InputEvent {
    InputEvent::new(InputKind::MouseUp, target)
}

#[test]
fn notifications_bubble_from_the_containing_node() {
    let (mut f, mut manager, _clock) = setup(SelectionConfig::default());
    let log = Log::default();
    manager
        .add_event_listener(&f.window, f.div, "selection", recorder(&log, "L1"))
        .unwrap();
    manager
        .add_event_listener(&f.window, f.em, "selection", recorder(&log, "L2"))
        .unwrap();

    user_selects(&mut f.window, f.em);
    let event = mouse_up(f.em);
    manager.dispatch_input(&mut f.window, &event).unwrap();
    assert_eq!(*log.borrow(), ["L2", "L1"]);
}

#[test]
fn stop_propagation_keeps_ancestors_quiet() {
    let (mut f, mut manager, _clock) = setup(SelectionConfig::default());
    let log = Log::default();
    manager
        .add_event_listener(&f.window, f.div, "selection", recorder(&log, "L1"))
        .unwrap();
    manager
        .add_event_listener(&f.window, f.em, "selection", stopper(&log, "L2"))
        .unwrap();
    manager
        .add_event_listener(&f.window, f.em, "selection", recorder(&log, "L3"))
        .unwrap();

    user_selects(&mut f.window, f.em);
    let event = mouse_up(f.em);
    manager.dispatch_input(&mut f.window, &event).unwrap();
    // Listeners on the same node still run.
    assert_eq!(*log.borrow(), ["L2", "L3"]);
}

#[test]
fn unchanged_selection_is_not_announced_twice() {
    let (mut f, mut manager, clock) = setup(SelectionConfig::default());
    let log = Log::default();
    manager
        .add_event_listener(&f.window, f.em, "selection", recorder(&log, "em"))
        .unwrap();

    user_selects(&mut f.window, f.em);
    let event = mouse_up(f.em);
    manager.dispatch_input(&mut f.window, &event).unwrap();
    clock.advance(at(500));
    manager.dispatch_input(&mut f.window, &event).unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn bursts_collapse_into_one_trailing_check() {
    let (mut f, mut manager, clock) = setup(SelectionConfig::default());
    let log = Log::default();
    manager
        .add_event_listener(&f.window, f.window.document().body(), "selection", recorder(&log, "body"))
        .unwrap();

    user_selects(&mut f.window, f.p);
    let first = mouse_up(f.p);
    manager.dispatch_input(&mut f.window, &first).unwrap();
    assert_eq!(log.borrow().len(), 1);

    user_selects(&mut f.window, f.em);
    clock.set(at(1_010));
    let key = InputEvent::new(InputKind::KeyUp, f.em);
    manager.dispatch_input(&mut f.window, &key).unwrap();
    assert_eq!(manager.pending_deadline(), Some(at(1_250)));
    clock.set(at(1_020));
    manager.dispatch_input(&mut f.window, &first).unwrap();
    assert_eq!(manager.pending_deadline(), Some(at(1_250)));
    assert_eq!(log.borrow().len(), 1);

    clock.set(at(1_249));
    assert!(!manager.run_pending(&mut f.window));
    clock.set(at(1_250));
    assert!(manager.run_pending(&mut f.window));
    assert!(!manager.run_pending(&mut f.window));
    assert_eq!(manager.pending_deadline(), None);
    assert_eq!(log.borrow().len(), 2);
    assert_eq!(manager.current().and_then(|s| s.containing_node(f.window.document())), Some(f.em));
}

#[test]
fn mouseout_counts_only_on_the_document_element() {
    let (mut f, mut manager, clock) = setup(SelectionConfig::default());
    let log = Log::default();
    manager
        .add_event_listener(&f.window, f.em, "selection", recorder(&log, "em"))
        .unwrap();
    user_selects(&mut f.window, f.em);

    let inner = InputEvent::new(InputKind::MouseOut, f.p);
    manager.dispatch_input(&mut f.window, &inner).unwrap();
    assert!(log.borrow().is_empty());

    clock.advance(at(300));
    let html = f.window.document().document_element();
    let leave = InputEvent::new(InputKind::MouseOut, html);
    manager.dispatch_input(&mut f.window, &leave).unwrap();
    assert_eq!(*log.borrow(), ["em"]);
}

#[test]
fn payload_carries_selection_target_and_source() {
    let (mut f, mut manager, _clock) = setup(SelectionConfig::default());
    let seen: Rc<RefCell<Vec<(NodeKey, Option<&'static str>, String)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let listener: Listener = Rc::new(
        move |_: &mut SelectionManager, window: &mut Window, event: &SelectionEvent| {
            let text = event.selection.get_text(window.document()).unwrap();
            sink.borrow_mut()
                .push((event.target, event.source_event_type(), text));
        },
    );
    manager
        .add_event_listener(&f.window, f.div, "selection", listener)
        .unwrap();

    user_selects(&mut f.window, f.em);
    let event = InputEvent::new(InputKind::KeyUp, f.em);
    manager.dispatch_input(&mut f.window, &event).unwrap();

    user_selects(&mut f.window, f.p2);
    manager.fire_event(&mut f.window, None, None, None);

    assert_eq!(
        *seen.borrow(),
        [
            (f.em, Some("keyup"), "two".to_string()),
            (f.p2, None, "four".to_string()),
        ]
    );
}

#[test]
fn listener_may_change_selection_mid_bubble() {
    let (mut f, mut manager, _clock) = setup(SelectionConfig::default());
    let p = f.p;
    let seen: Rc<RefCell<Vec<Option<NodeKey>>>> = Rc::default();

    let reselect: Listener = Rc::new(
        move |manager: &mut SelectionManager, window: &mut Window, _: &SelectionEvent| {
            manager.select_inside(window, p).unwrap();
        },
    );
    let sink = Rc::clone(&seen);
    let observe: Listener = Rc::new(
        move |manager: &mut SelectionManager, window: &mut Window, _: &SelectionEvent| {
            let node = manager.current().and_then(|s| s.containing_node(window.document()));
            sink.borrow_mut().push(node);
        },
    );
    manager
        .add_event_listener(&f.window, f.em, "selection", reselect)
        .unwrap();
    manager
        .add_event_listener(&f.window, f.div, "selection", observe)
        .unwrap();

    user_selects(&mut f.window, f.em);
    let event = mouse_up(f.em);
    manager.dispatch_input(&mut f.window, &event).unwrap();
    assert_eq!(*seen.borrow(), [Some(f.p)]);
}

#[test]
fn deselection_notice_precedes_the_new_selection() {
    let config = SelectionConfig {
        notify_deselection: true,
        ..SelectionConfig::default()
    };
    let (mut f, mut manager, clock) = setup(config);
    let seen: Rc<RefCell<Vec<(&'static str, bool)>>> = Rc::default();
    for (node, tag) in [(f.em, "em"), (f.p2, "p2")] {
        let sink = Rc::clone(&seen);
        let listener: Listener = Rc::new(
            move |_: &mut SelectionManager, _: &mut Window, event: &SelectionEvent| {
                let collapsed = event.selection.is_collapsed().unwrap();
                sink.borrow_mut().push((tag, collapsed));
            },
        );
        manager
            .add_event_listener(&f.window, node, "selection", listener)
            .unwrap();
    }

    user_selects(&mut f.window, f.em);
    let event = mouse_up(f.em);
    manager.dispatch_input(&mut f.window, &event).unwrap();
    clock.advance(at(300));
    user_selects(&mut f.window, f.p2);
    let event = mouse_up(f.p2);
    manager.dispatch_input(&mut f.window, &event).unwrap();

    assert_eq!(*seen.borrow(), [("em", false), ("em", true), ("p2", false)]);
}

#[test]
fn removed_listener_is_not_called() {
    let (mut f, mut manager, _clock) = setup(SelectionConfig::default());
    let log = Log::default();
    let first = recorder(&log, "first");
    manager
        .add_event_listener(&f.window, f.em, "selection", Rc::clone(&first))
        .unwrap();
    manager
        .add_event_listener(&f.window, f.em, "selection", recorder(&log, "second"))
        .unwrap();
    manager.remove_event_listener(f.em, "selection", &first);

    user_selects(&mut f.window, f.em);
    manager.fire_event(&mut f.window, None, None, None);
    assert_eq!(*log.borrow(), ["second"]);
}

#[test]
fn stop_observing_unhooks_input() {
    let (mut f, mut manager, _clock) = setup(SelectionConfig::default());
    let log = Log::default();
    manager
        .add_event_listener(&f.window, f.em, "selection", recorder(&log, "em"))
        .unwrap();
    manager.stop_observing(&f.window).unwrap();

    user_selects(&mut f.window, f.em);
    let event = mouse_up(f.em);
    manager.dispatch_input(&mut f.window, &event).unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn missing_events_provider_fails_loudly() {
    let mut f = fixture(RangeApi::Standard);
    let mut manager = SelectionManager::new().with_events(MissingEvents);
    let log = Log::default();
    let err = manager
        .add_event_listener(&f.window, f.em, "selection", recorder(&log, "em"))
        .unwrap_err();
    assert!(matches!(err, SelectionError::MissingEventsProvider { op: "add" }));

    let event = mouse_up(f.em);
    let err = manager.dispatch_input(&mut f.window, &event).unwrap_err();
    assert!(err.to_string().contains("route"));
}

#[test]
fn throttle_comes_from_toml() {
    let config = SelectionConfig::from_toml_str("event_throttle_ms = 50").unwrap();
    let (mut f, mut manager, clock) = setup(config);
    let event = mouse_up(f.em);
    manager.observe(&mut f.window, &event);
    clock.advance(at(20));
    manager.observe(&mut f.window, &event);
    assert_eq!(manager.pending_deadline(), Some(at(1_050)));
}
