//! Relay from broker slots to the result panel.

use crate::panel::PanelRegistry;
use crate::protocol::OutboundMessage;
use log::{info, warn};
use pq_broker::ValueBroker;
use std::cell::Cell;
use std::rc::Rc;

/// Wires every broker slot to the panel while the view subsystem is active.
pub struct ResultViewBridge {
    broker: Rc<ValueBroker>,
    registry: Rc<PanelRegistry>,
    active: Cell<bool>,
}

impl ResultViewBridge {
    pub fn new(registry: Rc<PanelRegistry>) -> Self {
        Self {
            broker: registry.broker().clone(),
            registry,
            active: Cell::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Attach one relay per slot. A repeated call is ignored and returns false.
    pub fn activate(&self) -> bool {
        if self.active.replace(true) {
            warn!("Result view relay already active, ignoring activation");
            return false;
        }

        let names = self.broker.slot_names();
        for name in &names {
            let registry = Rc::downgrade(&self.registry);
            let property = name.clone();
            self.broker.subscribe(name, move |value| {
                if let Some(registry) = registry.upgrade() {
                    registry.post_message(OutboundMessage::value_updated(
                        property.clone(),
                        value.clone(),
                    ));
                }
            });
        }

        info!("Result view relay active for {} slots", names.len());
        true
    }

    /// Drop every broker subscriber. The bridge can be activated again later.
    pub fn deactivate(&self) {
        if !self.active.replace(false) {
            return;
        }
        self.broker.clear_subscribers();
        info!("Result view relay deactivated");
    }
}
