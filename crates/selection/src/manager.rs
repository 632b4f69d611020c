//! The selection manager: current span, listener side table and the
//! debounced loop that turns user input into change notifications.

use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::events::{DirectEvents, EventsProvider, InputHandler};
use crate::listeners::{Listener, ListenerRegistry, SelectionEvent};
use crate::span::{Content, Span, Wrapper};
use dom::{NativeRange, NodeKey};
use platform::{Clock, InputEvent, InputKind, SystemClock, Window};
use std::rc::Rc;
use std::time::Duration;

/// Anything [`SelectionManager::select`] can make the active selection.
#[derive(Clone, Debug)]
pub enum SelectTarget {
    Node(NodeKey),
    Span(Span),
    Native(NativeRange),
}

impl From<NodeKey> for SelectTarget {
    fn from(node: NodeKey) -> Self {
        SelectTarget::Node(node)
    }
}

impl From<Span> for SelectTarget {
    fn from(span: Span) -> Self {
        SelectTarget::Span(span)
    }
}

impl From<NativeRange> for SelectTarget {
    fn from(range: NativeRange) -> Self {
        SelectTarget::Native(range)
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingCheck {
    due: Duration,
    event: InputEvent,
}

pub struct SelectionManager {
    config: SelectionConfig,
    current: Option<Span>,
    listeners: ListenerRegistry,
    events: Box<dyn EventsProvider>,
    clock: Box<dyn Clock>,
    observer: Option<InputHandler>,
    last_observed: Option<Duration>,
    pending: Option<PendingCheck>,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::with_config(SelectionConfig::default())
    }

    pub fn with_config(config: SelectionConfig) -> Self {
        Self {
            config,
            current: None,
            listeners: ListenerRegistry::default(),
            events: Box::new(DirectEvents::new()),
            clock: Box::new(SystemClock::new()),
            observer: None,
            last_observed: None,
            pending: None,
        }
    }

    /// Replaces the events provider. Call before the first listener is
    /// added; registrations already made stay with the old provider.
    pub fn with_events(mut self, events: impl EventsProvider + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn events(&self) -> &dyn EventsProvider {
        self.events.as_ref()
    }

    /// The span last installed or observed, if any.
    pub fn current(&self) -> Option<&Span> {
        self.current.as_ref()
    }

    // ---- reading and installing the selection -------------------------

    /// A fresh span over the host's selection. The native range is copied,
    /// so later changes to the live selection do not reach it.
    pub fn get_range(&self, window: &Window) -> Span {
        match window.selection_range() {
            Some(native) => Span::new(native),
            None => Span::default_for(window.document(), window.api()),
        }
    }

    pub fn select(
        &mut self,
        window: &mut Window,
        target: impl Into<SelectTarget>,
    ) -> Result<(), SelectionError> {
        let native = match target.into() {
            SelectTarget::Node(node) => window.create_native_range(node, false)?,
            SelectTarget::Span(span) => span.into_native(),
            SelectTarget::Native(native) => native,
        };
        self.select_native_range(window, &native);
        Ok(())
    }

    /// Selects exactly the content of `node`.
    pub fn select_inside(
        &mut self,
        window: &mut Window,
        node: NodeKey,
    ) -> Result<(), SelectionError> {
        let native = window.create_native_range(node, true)?;
        self.select_native_range(window, &native);
        Ok(())
    }

    pub fn select_native_range(&mut self, window: &mut Window, range: &NativeRange) {
        window.set_selection(range);
        self.current = Some(Span::new(range.clone()));
        log::debug!(target: "selection.manager", "selected {range:?}");
    }

    // ---- span wrappers over the host selection --------------------------

    pub fn get_text(&self, window: &Window) -> Result<String, SelectionError> {
        self.get_range(window).get_text(window.document())
    }

    pub fn get_html(&self, window: &Window) -> Result<String, SelectionError> {
        self.get_range(window).get_html(window.document())
    }

    pub fn clone_contents(&self, window: &mut Window) -> Result<NodeKey, SelectionError> {
        self.get_range(window).clone_contents(window.document_mut())
    }

    pub fn is_collapsed(&self, window: &Window) -> Result<bool, SelectionError> {
        self.get_range(window).is_collapsed()
    }

    pub fn equals<R: AsRef<NativeRange> + ?Sized>(&self, window: &Window, other: &R) -> bool {
        self.get_range(window).equals(other)
    }

    pub fn containing_node(&self, window: &Window) -> Option<NodeKey> {
        self.get_range(window).containing_node(window.document())
    }

    pub fn is_in(&self, window: &Window, node: NodeKey) -> bool {
        self.get_range(window).is_in(window.document(), node)
    }

    /// Runs [`Span::is_element`] on the host selection. With `normalize`,
    /// the snapped span becomes the active selection.
    pub fn is_element(
        &mut self,
        window: &mut Window,
        normalize: bool,
        outermost: Option<NodeKey>,
    ) -> Option<NodeKey> {
        let mut span = self.get_range(window);
        let found = span.is_element(window.document(), normalize, outermost);
        if normalize {
            self.select_native_range(window, span.native());
        }
        found
    }

    pub fn collapse(&mut self, window: &mut Window, to_start: bool) -> Result<(), SelectionError> {
        let mut span = self.get_range(window);
        span.collapse(to_start)?;
        self.select_native_range(window, span.native());
        Ok(())
    }

    /// Wraps the selected content and selects the wrapper.
    pub fn wrap_with(
        &mut self,
        window: &mut Window,
        wrapper: impl Into<Wrapper>,
    ) -> Result<NodeKey, SelectionError> {
        let mut span = self.get_range(window);
        let node = span.wrap_with(window.document_mut(), wrapper)?;
        self.select(window, node)?;
        Ok(node)
    }

    /// Replaces the selected content and selects what was inserted (or
    /// the point after it, for a collapsed selection).
    pub fn replace_with(
        &mut self,
        window: &mut Window,
        content: impl Into<Content>,
    ) -> Result<NodeKey, SelectionError> {
        let mut span = self.get_range(window);
        let node = span.replace_with(window.document_mut(), content)?;
        self.select_native_range(window, span.native());
        Ok(node)
    }

    // ---- listeners -------------------------------------------------------

    /// Registers `listener` for selection changes at or below `node`. The
    /// first registration also starts observing user input. `event_type`
    /// is accepted for symmetry with DOM listeners; there is only one kind
    /// of notification.
    pub fn add_event_listener(
        &mut self,
        window: &Window,
        node: NodeKey,
        event_type: &str,
        listener: Listener,
    ) -> Result<(), SelectionError> {
        if self.observer.is_none() {
            self.listen_to_selections(window)?;
        }
        log::trace!(target: "selection.manager", "add {event_type} listener on {node:?}");
        self.listeners.add(node, listener);
        Ok(())
    }

    /// Removes the first registration of `listener` on `node`.
    pub fn remove_event_listener(&mut self, node: NodeKey, _event_type: &str, listener: &Listener) {
        self.listeners.remove(node, listener);
    }

    fn listen_to_selections(&mut self, window: &Window) -> Result<(), SelectionError> {
        let doc = window.document();
        let handler: InputHandler = Rc::new(
            |manager: &mut SelectionManager, window: &mut Window, event: &InputEvent| {
                manager.observe(window, event)
            },
        );
        self.events
            .add(doc.body(), InputKind::MouseUp.name(), Rc::clone(&handler))?;
        self.events
            .add(doc.root(), InputKind::KeyUp.name(), Rc::clone(&handler))?;
        self.events
            .add(doc.root(), InputKind::MouseOut.name(), Rc::clone(&handler))?;
        log::debug!(
            target: "selection.manager",
            "observing selections through {} events",
            self.events.name()
        );
        self.observer = Some(handler);
        Ok(())
    }

    /// Unhooks the input handler registered by the first listener. Listeners
    /// stay registered; adding another one resumes observation.
    pub fn stop_observing(&mut self, window: &Window) -> Result<(), SelectionError> {
        let Some(handler) = self.observer.take() else {
            return Ok(());
        };
        let doc = window.document();
        self.events
            .remove(doc.body(), InputKind::MouseUp.name(), &handler)?;
        self.events
            .remove(doc.root(), InputKind::KeyUp.name(), &handler)?;
        self.events
            .remove(doc.root(), InputKind::MouseOut.name(), &handler)?;
        self.pending = None;
        Ok(())
    }

    // ---- observation loop -------------------------------------------------

    /// Hands a host input event to the handlers the events provider routes
    /// it to.
    pub fn dispatch_input(
        &mut self,
        window: &mut Window,
        event: &InputEvent,
    ) -> Result<(), SelectionError> {
        let handlers = self.events.route(window.document(), event)?;
        for handler in handlers {
            handler(self, window, event);
        }
        Ok(())
    }

    /// One observed input signal. Signals closer together than the
    /// configured throttle collapse into a single trailing check.
    pub fn observe(&mut self, window: &mut Window, event: &InputEvent) {
        let now = self.clock.now();
        if let Some(last) = self.last_observed {
            let throttle = self.config.event_throttle;
            if now.saturating_sub(last) < throttle {
                if self.pending.is_none() {
                    let due = last + throttle;
                    log::debug!(
                        target: "selection.manager",
                        "deferring {} check by {:?}",
                        event.kind.name(),
                        due.saturating_sub(now)
                    );
                    self.pending = Some(PendingCheck { due, event: *event });
                }
                return;
            }
        }
        self.pending = None;
        self.last_observed = Some(now);

        // Leaving an inner element bubbles up here too; only leaving the
        // document element counts.
        if event.kind == InputKind::MouseOut && event.target != window.document().document_element()
        {
            return;
        }
        self.check_selection(window, event.kind);
    }

    /// When the deferred check is due, if one is waiting.
    pub fn pending_deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.due)
    }

    /// Runs the deferred check if its deadline has passed. Returns whether
    /// it ran.
    pub fn run_pending(&mut self, window: &mut Window) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if self.clock.now() < pending.due {
            return false;
        }
        self.pending = None;
        self.observe(window, &pending.event);
        true
    }

    fn check_selection(&mut self, window: &mut Window, source: InputKind) {
        let span = self.get_range(window);
        if self.current.as_ref().is_some_and(|current| current.equals(&span)) {
            return;
        }
        let root = window.document().root();
        if self.config.notify_deselection {
            if let Some(previous) = self.current.take() {
                let target = previous.containing_node(window.document()).unwrap_or(root);
                let empty = Span::default_for(window.document(), window.api());
                self.fire_event(window, Some(target), Some(source), Some(empty));
            }
        }
        let target = span.containing_node(window.document()).unwrap_or(root);
        log::debug!(target: "selection.manager", "selection changed, notifying {target:?}");
        self.current = Some(span);
        self.fire_event(window, Some(target), Some(source), None);
    }

    /// Raises a selection notification at `target` and bubbles it to the
    /// root. Without a target, the host selection is re-read, stored as
    /// current and its containing node is used. Without `selection`, the
    /// payload carries the current span.
    pub fn fire_event(
        &mut self,
        window: &mut Window,
        target: Option<NodeKey>,
        source: Option<InputKind>,
        selection: Option<Span>,
    ) {
        let target = match target {
            Some(node) => node,
            None => {
                let span = self.get_range(window);
                let node = span
                    .containing_node(window.document())
                    .unwrap_or(window.document().root());
                self.current = Some(span);
                node
            }
        };
        let selection = selection
            .or_else(|| self.current.clone())
            .unwrap_or_else(|| Span::default_for(window.document(), window.api()));
        let event = SelectionEvent::new(selection, target, source);

        let mut node = Some(target);
        while let Some(current) = node {
            for listener in self.listeners.snapshot(current) {
                listener(self, window, &event);
            }
            if event.is_propagation_stopped() {
                log::trace!(target: "selection.manager", "propagation stopped at {current:?}");
                break;
            }
            node = window.document().parent(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::RangeApi;
    use platform::ManualClock;

    #[test]
    fn get_range_copies_the_live_selection() {
        let mut window = Window::new(RangeApi::Standard);
        let body = window.document().body();
        let p = window.document_mut().create_element("p");
        window.document_mut().append_child(body, p).unwrap();
        let mut manager = SelectionManager::new();
        manager.select_inside(&mut window, body).unwrap();

        let before = manager.get_range(&window);
        if let Some(NativeRange::Standard(live)) = window.selection_mut() {
            live.collapse(true);
        }
        assert!(!before.is_collapsed().unwrap());
        assert!(manager.is_collapsed(&window).unwrap());
    }

    #[test]
    fn empty_standard_selection_reads_as_default_span() {
        let window = Window::new(RangeApi::Standard);
        let manager = SelectionManager::new();
        let span = manager.get_range(&window);
        assert!(span.is_collapsed().unwrap());
        assert_eq!(manager.containing_node(&window), Some(window.document().document_element()));
    }

    #[test]
    fn first_signal_is_processed_at_once() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(5));
        let mut window = Window::new(RangeApi::Standard);
        let mut manager = SelectionManager::new().with_clock(clock.clone());
        let event = InputEvent::new(InputKind::MouseUp, window.document().body());

        manager.observe(&mut window, &event);
        assert_eq!(manager.pending_deadline(), None);
        assert!(manager.current().is_some());
    }

    #[test]
    fn inner_mouseout_is_ignored() {
        let mut window = Window::new(RangeApi::Standard);
        let mut manager = SelectionManager::new().with_clock(ManualClock::new());
        let inner = InputEvent::new(InputKind::MouseOut, window.document().body());
        manager.observe(&mut window, &inner);
        assert!(manager.current().is_none());
    }

    #[test]
    fn collapse_reinstalls_selection() {
        let mut window = Window::new(RangeApi::Standard);
        let body = window.document().body();
        let t = window.document_mut().create_text("abc");
        window.document_mut().append_child(body, t).unwrap();
        let mut manager = SelectionManager::new();
        manager.select_inside(&mut window, t).unwrap();
        manager.collapse(&mut window, false).unwrap();
        assert!(manager.is_collapsed(&window).unwrap());
        assert!(manager.current().unwrap().equals(&manager.get_range(&window)));
    }
}
