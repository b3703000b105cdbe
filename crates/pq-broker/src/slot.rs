//! A single named value slot.

use serde_json::Value;
use std::rc::Rc;

/// Callback invoked with a slot's value on every delivery.
pub type Subscriber = Rc<dyn Fn(&Value)>;

/// Latest value plus the ordered subscriber list for one name.
///
/// Subscribers are only ever appended or cleared all at once.
pub(crate) struct ValueSlot {
    pub name: String,
    pub current: Option<Value>,
    pub subscribers: Vec<Subscriber>,
}

impl ValueSlot {
    pub fn new(name: String) -> Self {
        Self {
            name,
            current: None,
            subscribers: Vec::new(),
        }
    }

    /// Value handed to subscribers. Slots that were never set deliver `null`.
    pub fn delivered_value(&self) -> Value {
        self.current.clone().unwrap_or(Value::Null)
    }
}
