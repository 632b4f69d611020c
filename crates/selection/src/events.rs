//! Adapters between host input events and the selection observer.
//!
//! The manager never talks to the host's event system directly. It asks an
//! [`EventsProvider`] to register its input handler and, when the host
//! reports an input event, asks the provider which handlers should run.

use crate::error::SelectionError;
use crate::manager::SelectionManager;
use dom::{Document, NodeKey};
use platform::{InputEvent, Window};
use std::collections::HashMap;
use std::rc::Rc;

pub type InputHandler = Rc<dyn Fn(&mut SelectionManager, &mut Window, &InputEvent)>;

pub trait EventsProvider {
    fn name(&self) -> &'static str;

    fn add(&mut self, node: NodeKey, event: &str, handler: InputHandler)
    -> Result<(), SelectionError>;

    fn remove(
        &mut self,
        node: NodeKey,
        event: &str,
        handler: &InputHandler,
    ) -> Result<(), SelectionError>;

    /// Handlers to run for `event`, in invocation order.
    fn route(&self, doc: &Document, event: &InputEvent) -> Result<Vec<InputHandler>, SelectionError>;
}

/// Default provider: keeps registrations itself and bubbles each event from
/// its target up through the target's ancestors.
#[derive(Default)]
pub struct DirectEvents {
    handlers: HashMap<(NodeKey, String), Vec<InputHandler>>,
}

impl DirectEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered(&self, node: NodeKey, event: &str) -> usize {
        self.handlers
            .get(&(node, event.to_string()))
            .map_or(0, Vec::len)
    }
}

impl EventsProvider for DirectEvents {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn add(
        &mut self,
        node: NodeKey,
        event: &str,
        handler: InputHandler,
    ) -> Result<(), SelectionError> {
        self.handlers
            .entry((node, event.to_string()))
            .or_default()
            .push(handler);
        Ok(())
    }

    fn remove(
        &mut self,
        node: NodeKey,
        event: &str,
        handler: &InputHandler,
    ) -> Result<(), SelectionError> {
        if let Some(list) = self.handlers.get_mut(&(node, event.to_string())) {
            if let Some(idx) = list.iter().position(|h| Rc::ptr_eq(h, handler)) {
                list.remove(idx);
            }
        }
        Ok(())
    }

    fn route(&self, doc: &Document, event: &InputEvent) -> Result<Vec<InputHandler>, SelectionError> {
        let name = event.kind.name();
        let mut out = Vec::new();
        for node in doc.ancestors(event.target) {
            if let Some(list) = self.handlers.get(&(node, name.to_string())) {
                out.extend(list.iter().cloned());
            }
        }
        Ok(out)
    }
}

/// Stands in when no provider has been configured. Every call fails, so a
/// listener registration can never be silently dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct MissingEvents;

impl EventsProvider for MissingEvents {
    fn name(&self) -> &'static str {
        "missing"
    }

    fn add(&mut self, _: NodeKey, _: &str, _: InputHandler) -> Result<(), SelectionError> {
        Err(SelectionError::MissingEventsProvider { op: "add" })
    }

    fn remove(&mut self, _: NodeKey, _: &str, _: &InputHandler) -> Result<(), SelectionError> {
        Err(SelectionError::MissingEventsProvider { op: "remove" })
    }

    fn route(&self, _: &Document, _: &InputEvent) -> Result<Vec<InputHandler>, SelectionError> {
        Err(SelectionError::MissingEventsProvider { op: "route" })
    }
}
