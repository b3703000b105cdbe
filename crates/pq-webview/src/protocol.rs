//! Messages exchanged with the embedded content.
//!
//! Outbound: `{ "type": <variant>, "payload": <body> }`
//! Inbound: `{ "type": <variant>, ... }`, unknown types decode to `Unknown`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host → content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum OutboundMessage {
    /// One broker slot changed (or was re-emitted).
    OnOneValueUpdated { property: String, value: Value },
}

impl OutboundMessage {
    pub fn value_updated(property: impl Into<String>, value: Value) -> Self {
        OutboundMessage::OnOneValueUpdated {
            property: property.into(),
            value,
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Content → host.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// Content finished loading and wants a full snapshot.
    #[serde(rename = "onReady")]
    OnReady,
    /// Any type this side does not know about yet.
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    /// Decode a raw message. Fails only when `type` is missing or not a string.
    pub fn parse(message: &Value) -> Result<Self, serde_json::Error> {
        InboundMessage::deserialize(message)
    }
}
