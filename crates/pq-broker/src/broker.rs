//! ValueBroker implementation.

use crate::slot::{Subscriber, ValueSlot};
use log::{debug, trace};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle returned by [`ValueBroker::subscribe`].
///
/// There is no per-subscription removal; the handle only records where the
/// callback landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    slot: String,
    position: usize,
}

impl Subscription {
    /// Name of the slot the callback was attached to.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Zero-based position in the slot's subscriber list.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Fixed registry of named value slots.
///
/// The slot set is decided at construction and never changes. Asking for a
/// name that was not registered is a programming error and panics.
pub struct ValueBroker {
    /// Slots in construction order (drives `emit_all` ordering).
    slots: Vec<RefCell<ValueSlot>>,
    /// Slot position keyed by name.
    index: HashMap<String, usize>,
}

impl ValueBroker {
    /// Create a broker with one slot per name. Duplicate names share a slot.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots = Vec::new();
        let mut index = HashMap::new();

        for name in names {
            let name = name.into();
            if index.contains_key(&name) {
                continue;
            }
            index.insert(name.clone(), slots.len());
            slots.push(RefCell::new(ValueSlot::new(name)));
        }

        debug!("Value broker created with {} slots", slots.len());

        Self { slots, index }
    }

    /// Whether `name` is one of this broker's slots.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Slot names in construction order.
    pub fn slot_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.borrow().name.clone()).collect()
    }

    /// Latest stored value of a slot.
    pub fn current(&self, name: &str) -> Option<Value> {
        self.slot(name).borrow().current.clone()
    }

    /// Number of callbacks attached to a slot.
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.slot(name).borrow().subscribers.len()
    }

    /// Store a new value and deliver it to every subscriber of the slot.
    pub fn set(&self, name: &str, value: Value) {
        let slot = self.slot(name);
        slot.borrow_mut().current = Some(value);
        deliver(slot);
    }

    /// Re-deliver the slot's stored value to its subscribers.
    pub fn emit(&self, name: &str) {
        deliver(self.slot(name));
    }

    /// Re-deliver every slot's stored value, whether or not it changed.
    pub fn emit_all(&self) {
        trace!("Emitting snapshot of {} slots", self.slots.len());
        for slot in &self.slots {
            deliver(slot);
        }
    }

    /// Append a callback to a slot's subscriber list.
    pub fn subscribe<F>(&self, name: &str, callback: F) -> Subscription
    where
        F: Fn(&Value) + 'static,
    {
        let mut slot = self.slot(name).borrow_mut();
        let subscriber: Subscriber = Rc::new(callback);
        slot.subscribers.push(subscriber);

        Subscription {
            slot: slot.name.clone(),
            position: slot.subscribers.len() - 1,
        }
    }

    /// Drop every subscriber of every slot. Stored values are kept.
    pub fn clear_subscribers(&self) {
        for slot in &self.slots {
            slot.borrow_mut().subscribers.clear();
        }
        debug!("Cleared all value broker subscribers");
    }

    fn slot(&self, name: &str) -> &RefCell<ValueSlot> {
        match self.index.get(name) {
            Some(&i) => &self.slots[i],
            None => panic!("unknown value slot '{}'", name),
        }
    }
}

// === Internal implementation ===

/// Invoke the slot's subscribers in order with its current value.
///
/// Works on a snapshot so callbacks may call back into the broker.
fn deliver(slot: &RefCell<ValueSlot>) {
    let (value, subscribers) = {
        let slot = slot.borrow();
        (slot.delivered_value(), slot.subscribers.clone())
    };

    for subscriber in &subscribers {
        subscriber(&value);
    }
}
