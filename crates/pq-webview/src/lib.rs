//! pq-webview - Result view panel for embedded web content
//!
//! Features:
//! - Single live panel per registry, revived across host restarts
//! - Closed, serde-tagged message protocol in both directions
//! - Relay from `pq-broker` slots to the panel, with snapshot on ready

pub mod bridge;
pub mod disposable;
pub mod error;
pub mod event;
pub mod host;
pub mod html;
pub mod panel;
pub mod protocol;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::ResultViewBridge;
pub use disposable::{Disposable, DisposableStore};
pub use error::HostError;
pub use event::Listeners;
pub use host::{ViewColumn, WebviewHost, WebviewOptions, WebviewSurface};
pub use panel::{PanelConfig, PanelRegistry, ResultPanel};
pub use protocol::{InboundMessage, OutboundMessage};
