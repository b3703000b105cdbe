//! Listener lists for host-side events.
//!
//! Hosts keep one list per event kind. Adding a listener hands back a
//! [`Disposable`] that removes exactly that listener; firing works on a
//! snapshot, so listeners may add or remove registrations while running.

use crate::disposable::Disposable;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Registered listeners of one event kind.
pub struct Listeners<T: ?Sized> {
    entries: Rc<RefCell<Vec<(u64, Rc<T>)>>>,
    next_id: Cell<u64>,
}

impl<T: ?Sized + 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Register a listener. Disposing the result unregisters it.
    pub fn add(&self, listener: Rc<T>) -> Disposable {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));

        let entries = Rc::downgrade(&self.entries);
        Disposable::new(move || {
            if let Some(entries) = entries.upgrade() {
                entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
            }
            Ok(())
        })
    }

    /// Listeners registered right now, in registration order.
    pub fn snapshot(&self) -> Vec<Rc<T>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop all listeners without going through their disposables.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<T: ?Sized + 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}
