//! Host platform contract.
//!
//! The editor owns the actual panels; the core only talks to it through
//! these traits. Every call is a non-blocking request: `Ok` means the host
//! accepted it, not that it completed.

use crate::disposable::Disposable;
use crate::error::HostError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Where a panel is placed relative to the editor groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewColumn {
    Active,
    Beside,
    Number(u8),
}

/// Permissions of an embedded content surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebviewOptions {
    pub enable_scripts: bool,
    /// Directories the surface may load resources from.
    pub local_resource_roots: Vec<PathBuf>,
    pub retain_context_when_hidden: bool,
}

/// Listener for visibility changes; receives the new visibility.
pub type ViewStateListener = Box<dyn Fn(bool)>;
/// Listener fired once when the surface is closed.
pub type DisposeListener = Box<dyn Fn()>;
/// Listener for messages posted by the embedded content.
pub type MessageListener = Box<dyn Fn(&Value)>;

/// One live embedded content surface.
pub trait WebviewSurface {
    fn view_type(&self) -> &str;

    fn is_visible(&self) -> bool;

    /// Bring the surface to front, optionally moving it to `column`.
    fn reveal(&self, column: Option<ViewColumn>) -> Result<(), HostError>;

    fn set_options(&self, options: WebviewOptions) -> Result<(), HostError>;

    /// Replace the surface's document.
    fn set_html(&self, html: String) -> Result<(), HostError>;

    /// Send a message to the embedded content.
    fn post_message(&self, message: Value) -> Result<(), HostError>;

    /// Turn a local file path into a reference the content can load.
    fn as_webview_uri(&self, path: &Path) -> String;

    /// Ask the host to close the surface.
    fn dispose(&self) -> Result<(), HostError>;

    fn on_did_change_view_state(&self, listener: ViewStateListener) -> Disposable;

    fn on_did_dispose(&self, listener: DisposeListener) -> Disposable;

    fn on_did_receive_message(&self, listener: MessageListener) -> Disposable;
}

/// Window-level host services.
pub trait WebviewHost {
    /// Column of the active text editor, if any.
    fn active_column(&self) -> Option<ViewColumn>;

    fn create_webview_panel(
        &self,
        view_type: &str,
        title: &str,
        column: ViewColumn,
        options: WebviewOptions,
    ) -> Result<Rc<dyn WebviewSurface>, HostError>;

    fn execute_command(&self, command: &str, args: Value) -> Result<(), HostError>;
}
