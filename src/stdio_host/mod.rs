//! Host adapter for an editor that talks newline-delimited JSON over stdio.
//!
//! - stdin: [`HostEvent`]s, read on a background thread
//! - stdout: `HostRequest`s, written from the event loop
//!
//! Panels are addressed by id. Ids of panels created here are
//! `panel-<session>-<n>`; revived panels keep the id the editor hands back,
//! which may come from an earlier run.

mod events;
mod requests;
mod surface;

pub use events::{HostEvent, spawn_reader};
pub use requests::Outbox;
pub use surface::StdioSurface;

use requests::HostRequest;

use log::{debug, warn};
use pq_webview::{HostError, ViewColumn, WebviewHost, WebviewOptions, WebviewSurface};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-process prefix of allocated panel ids. Must differ between runs.
fn session_nonce() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    format!("{:x}{:x}", std::process::id(), nanos)
}

pub struct StdioHost {
    outbox: Outbox,
    session: String,
    panels: RefCell<HashMap<String, Rc<StdioSurface>>>,
    next_panel: Cell<u64>,
    active_column: Cell<Option<ViewColumn>>,
}

impl StdioHost {
    pub fn new(outbox: Outbox) -> Self {
        Self::with_session(outbox, session_nonce())
    }

    pub fn with_session(outbox: Outbox, session: String) -> Self {
        debug!("Stdio host session '{}'", session);
        Self {
            outbox,
            session,
            panels: RefCell::new(HashMap::new()),
            next_panel: Cell::new(1),
            active_column: Cell::new(None),
        }
    }

    /// Announce a command id to the editor.
    pub fn register_command(&self, command: &str) -> Result<(), HostError> {
        self.outbox.send(&HostRequest::RegisterCommand { command })
    }

    /// Ask the editor to revive panels of `view_type` after a restart.
    pub fn register_panel_serializer(&self, view_type: &str) -> Result<(), HostError> {
        self.outbox
            .send(&HostRequest::RegisterPanelSerializer { view_type })
    }

    /// Track a panel the editor restored on its own. `None` when a live
    /// panel already owns `panel_id`.
    pub fn adopt(&self, panel_id: String, view_type: String) -> Option<Rc<StdioSurface>> {
        let live = self
            .panels
            .borrow()
            .get(&panel_id)
            .is_some_and(|s| !s.is_closed());
        if live {
            warn!("Panel '{}' is already live, not adopting it again", panel_id);
            return None;
        }

        let surface = Rc::new(StdioSurface::new(panel_id, view_type, self.outbox.clone()));
        self.track(surface.clone());
        Some(surface)
    }

    /// Open panels currently tracked.
    #[cfg(test)]
    pub fn panel_count(&self) -> usize {
        self.panels.borrow().values().filter(|s| !s.is_closed()).count()
    }

    pub fn set_active_column(&self, column: Option<ViewColumn>) {
        self.active_column.set(column);
    }

    pub fn view_state_changed(&self, panel_id: &str, visible: bool) {
        if let Some(surface) = self.surface(panel_id) {
            surface.notify_view_state(visible);
        }
    }

    pub fn panel_message(&self, panel_id: &str, message: &Value) {
        if let Some(surface) = self.surface(panel_id) {
            surface.notify_message(message);
        }
    }

    pub fn panel_disposed(&self, panel_id: &str) {
        let removed = self.panels.borrow_mut().remove(panel_id);
        match removed {
            Some(surface) => {
                debug!("Panel '{}' closed by the editor", surface.id());
                surface.notify_disposed();
            }
            None => debug!("Dispose for unknown panel '{}'", panel_id),
        }
    }

    fn surface(&self, panel_id: &str) -> Option<Rc<StdioSurface>> {
        let surface = self.panels.borrow().get(panel_id).cloned();
        if surface.is_none() {
            debug!("Event for unknown panel '{}'", panel_id);
        }
        surface
    }

    /// Start routing events for `surface`, dropping panels closed from here.
    fn track(&self, surface: Rc<StdioSurface>) {
        let mut panels = self.panels.borrow_mut();
        panels.retain(|_, s| !s.is_closed());
        panels.insert(surface.id().to_string(), surface);
    }

    fn allocate_id(&self) -> String {
        let n = self.next_panel.get();
        self.next_panel.set(n + 1);
        format!("panel-{}-{}", self.session, n)
    }
}

impl WebviewHost for StdioHost {
    fn active_column(&self) -> Option<ViewColumn> {
        self.active_column.get()
    }

    fn create_webview_panel(
        &self,
        view_type: &str,
        title: &str,
        column: ViewColumn,
        options: WebviewOptions,
    ) -> Result<Rc<dyn WebviewSurface>, HostError> {
        let panel_id = self.allocate_id();
        self.outbox.send(&HostRequest::CreatePanel {
            panel_id: &panel_id,
            view_type,
            title,
            column,
            options: &options,
        })?;

        let surface = Rc::new(StdioSurface::new(
            panel_id.clone(),
            view_type.to_string(),
            self.outbox.clone(),
        ));
        self.track(surface.clone());
        Ok(surface)
    }

    fn execute_command(&self, command: &str, args: Value) -> Result<(), HostError> {
        self.outbox.send(&HostRequest::ExecuteCommand {
            command,
            args: &args,
        })
    }
}
