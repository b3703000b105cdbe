//! pq-broker: named reactive value slots
//!
//! A broker owns a fixed set of slots, each holding the latest value and
//! the callbacks subscribed to it. Everything runs on the caller's thread:
//! - `set` stores a value and fans it out immediately
//! - `emit` / `emit_all` re-deliver stored values on demand
//! - `clear_subscribers` drops every callback but keeps the values

mod broker;
mod slot;

pub use broker::{Subscription, ValueBroker};
pub use slot::Subscriber;
