use crate::manager::SelectionManager;
use std::cell::RefCell;

thread_local! {
    static DEFAULT: RefCell<SelectionManager> = RefCell::new(SelectionManager::new());
}

/// Runs `f` with this thread's default manager, for call sites that do not
/// thread a manager of their own through.
///
/// # Panics
///
/// Panics if called again from inside `f` (including from a listener the
/// default manager is running).
pub fn with_default<R>(f: impl FnOnce(&mut SelectionManager) -> R) -> R {
    DEFAULT.with(|manager| f(&mut manager.borrow_mut()))
}
