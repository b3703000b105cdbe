//! Panel surface proxied over stdio.

use super::requests::{HostRequest, Outbox};
use pq_webview::host::{DisposeListener, MessageListener, ViewStateListener};
use pq_webview::{Disposable, HostError, Listeners, ViewColumn, WebviewOptions, WebviewSurface};
use serde_json::Value;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// Origin the editor serves local resources from inside webviews.
const RESOURCE_ORIGIN: &str = "https://file+.vscode-resource.vscode-cdn.net";

pub struct StdioSurface {
    id: String,
    view_type: String,
    outbox: Outbox,
    visible: Cell<bool>,
    closed: Cell<bool>,
    view_state: Listeners<dyn Fn(bool)>,
    disposed: Listeners<dyn Fn()>,
    messages: Listeners<dyn Fn(&Value)>,
}

impl StdioSurface {
    pub fn new(id: String, view_type: String, outbox: Outbox) -> Self {
        Self {
            id,
            view_type,
            outbox,
            visible: Cell::new(true),
            closed: Cell::new(false),
            view_state: Listeners::new(),
            disposed: Listeners::new(),
            messages: Listeners::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.view_state.len() + self.disposed.len() + self.messages.len()
    }

    pub(super) fn notify_view_state(&self, visible: bool) {
        self.visible.set(visible);
        for listener in self.view_state.snapshot() {
            listener(visible);
        }
    }

    pub(super) fn notify_message(&self, message: &Value) {
        for listener in self.messages.snapshot() {
            listener(message);
        }
    }

    /// Fire the close listeners once, then drop whatever is still registered.
    pub(super) fn notify_disposed(&self) {
        if self.closed.replace(true) {
            return;
        }
        self.visible.set(false);
        for listener in self.disposed.snapshot() {
            listener();
        }
        self.view_state.clear();
        self.disposed.clear();
        self.messages.clear();
    }

    fn ensure_open(&self) -> Result<(), HostError> {
        if self.closed.get() {
            return Err(HostError::Disposed);
        }
        Ok(())
    }
}

impl WebviewSurface for StdioSurface {
    fn view_type(&self) -> &str {
        &self.view_type
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn reveal(&self, column: Option<ViewColumn>) -> Result<(), HostError> {
        self.ensure_open()?;
        self.outbox.send(&HostRequest::RevealPanel {
            panel_id: &self.id,
            column,
        })
    }

    fn set_options(&self, options: WebviewOptions) -> Result<(), HostError> {
        self.ensure_open()?;
        self.outbox.send(&HostRequest::SetOptions {
            panel_id: &self.id,
            options: &options,
        })
    }

    fn set_html(&self, html: String) -> Result<(), HostError> {
        self.ensure_open()?;
        self.outbox.send(&HostRequest::SetHtml {
            panel_id: &self.id,
            html: &html,
        })
    }

    fn post_message(&self, message: Value) -> Result<(), HostError> {
        self.ensure_open()?;
        self.outbox.send(&HostRequest::PostMessage {
            panel_id: &self.id,
            message: &message,
        })
    }

    fn as_webview_uri(&self, path: &Path) -> String {
        let path = path.to_string_lossy().replace('\\', "/").replace(' ', "%20");
        if path.starts_with('/') {
            format!("{}{}", RESOURCE_ORIGIN, path)
        } else {
            format!("{}/{}", RESOURCE_ORIGIN, path)
        }
    }

    /// Ask the editor to close the panel. The close listeners fire right
    /// away; the editor's own `panelDisposed` echo is then a no-op.
    fn dispose(&self) -> Result<(), HostError> {
        self.ensure_open()?;
        let sent = self
            .outbox
            .send(&HostRequest::DisposePanel { panel_id: &self.id });
        self.notify_disposed();
        sent
    }

    fn on_did_change_view_state(&self, listener: ViewStateListener) -> Disposable {
        self.view_state.add(Rc::from(listener))
    }

    fn on_did_dispose(&self, listener: DisposeListener) -> Disposable {
        self.disposed.add(Rc::from(listener))
    }

    fn on_did_receive_message(&self, listener: MessageListener) -> Disposable {
        self.messages.add(Rc::from(listener))
    }
}
