use crate::manager::SelectionManager;
use crate::span::Span;
use dom::NodeKey;
use platform::{InputKind, Window};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Selection change callback. Listeners get the manager back so they can
/// change the selection while a notification is still bubbling.
pub type Listener = Rc<dyn Fn(&mut SelectionManager, &mut Window, &SelectionEvent)>;

/// Payload of a selection change notification.
pub struct SelectionEvent {
    pub selection: Span,
    pub target: NodeKey,
    pub source_event: Option<InputKind>,
    stopped: Cell<bool>,
}

impl SelectionEvent {
    pub(crate) fn new(selection: Span, target: NodeKey, source_event: Option<InputKind>) -> Self {
        Self {
            selection,
            target,
            source_event,
            stopped: Cell::new(false),
        }
    }

    /// Stops the walk to ancestors once the current node's listeners ran.
    pub fn stop_propagation(&self) {
        self.stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped.get()
    }

    /// DOM name of the input that caused the change, if any.
    pub fn source_event_type(&self) -> Option<&'static str> {
        self.source_event.map(InputKind::name)
    }
}

/// Listener lists keyed by node, kept beside the tree.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    by_node: HashMap<NodeKey, Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn add(&mut self, node: NodeKey, listener: Listener) {
        self.by_node.entry(node).or_default().push(listener);
    }

    pub fn remove(&mut self, node: NodeKey, listener: &Listener) -> bool {
        let Some(list) = self.by_node.get_mut(&node) else {
            return false;
        };
        match list.iter().position(|l| Rc::ptr_eq(l, listener)) {
            Some(idx) => {
                list.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Copy of the listeners on `node`, so they may register or remove
    /// listeners while running.
    pub fn snapshot(&self, node: NodeKey) -> Vec<Listener> {
        self.by_node.get(&node).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.values().all(Vec::is_empty)
    }
}
