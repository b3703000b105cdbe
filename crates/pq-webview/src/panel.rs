//! Result panel lifecycle.
//!
//! States: no panel → one live panel → disposed (terminal for that panel).
//! The registry is the only owner of the live panel; the panel's listeners
//! only hold weak references back to it.

use crate::disposable::DisposableStore;
use crate::error::HostError;
use crate::host::{ViewColumn, WebviewHost, WebviewOptions, WebviewSurface};
use crate::html;
use crate::protocol::{InboundMessage, OutboundMessage};
use log::{debug, info, warn};
use pq_broker::ValueBroker;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::{Rc, Weak};

/// Static description of the result panel.
#[derive(Clone, Debug)]
pub struct PanelConfig {
    /// Identifier the host uses to serialize and revive the panel.
    pub view_type: String,
    pub title: String,
    /// Install location of the extension.
    pub extension_root: PathBuf,
    /// Directory holding the bundled script, relative to `extension_root`.
    pub script_dir: PathBuf,
    pub script_file: String,
    pub retain_context_when_hidden: bool,
    /// Command that switches the editor layout.
    pub layout_command: String,
}

impl PanelConfig {
    /// The only directory the surface may load resources from.
    pub fn resource_root(&self) -> PathBuf {
        self.extension_root.join(&self.script_dir)
    }

    pub fn script_path(&self) -> PathBuf {
        self.resource_root().join(&self.script_file)
    }

    pub fn webview_options(&self) -> WebviewOptions {
        WebviewOptions {
            enable_scripts: true,
            local_resource_roots: vec![self.resource_root()],
            retain_context_when_hidden: self.retain_context_when_hidden,
        }
    }
}

/// Arguments for the layout command: two side-by-side editor groups.
fn two_column_layout() -> Value {
    json!({
        "orientation": 0,
        "groups": [{ "size": 0.5 }, { "size": 0.5 }]
    })
}

/// Wrapper around one live result surface.
pub struct ResultPanel {
    surface: Rc<dyn WebviewSurface>,
    config: Rc<PanelConfig>,
    /// Content-addressed script reference, resolved once per panel.
    script: String,
    /// Listener registrations, released when the panel goes away.
    disposables: RefCell<DisposableStore>,
    disposed: Cell<bool>,
}

impl ResultPanel {
    /// Wrap `surface`, render it and hook up its events.
    fn attach(
        surface: Rc<dyn WebviewSurface>,
        config: Rc<PanelConfig>,
        registry: &Rc<PanelRegistry>,
    ) -> Rc<Self> {
        let script = html::script_reference(surface.as_ref(), &config.script_path());
        let panel = Rc::new(ResultPanel {
            surface: surface.clone(),
            config,
            script,
            disposables: RefCell::new(DisposableStore::new()),
            disposed: Cell::new(false),
        });

        panel.update();

        let weak_panel = Rc::downgrade(&panel);
        let on_view_state = surface.on_did_change_view_state(Box::new(move |visible: bool| {
            if !visible {
                return;
            }
            if let Some(panel) = weak_panel.upgrade() {
                panel.update();
            }
        }));

        let weak_panel = Rc::downgrade(&panel);
        let weak_registry = Rc::downgrade(registry);
        let on_dispose = surface.on_did_dispose(Box::new(move || {
            if let Some(registry) = weak_registry.upgrade() {
                registry.handle_disposed(&weak_panel);
            }
        }));

        let weak_registry = Rc::downgrade(registry);
        let on_message = surface.on_did_receive_message(Box::new(move |message: &Value| {
            if let Some(registry) = weak_registry.upgrade() {
                registry.handle_message(message);
            }
        }));

        {
            let mut disposables = panel.disposables.borrow_mut();
            disposables.push(on_view_state);
            disposables.push(on_dispose);
            disposables.push(on_message);
        }

        panel
    }

    pub fn surface(&self) -> &Rc<dyn WebviewSurface> {
        &self.surface
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Number of resources still owned by the panel.
    pub fn owned_resources(&self) -> usize {
        self.disposables.borrow().len()
    }

    /// Re-render the bootstrap document. Safe to repeat.
    pub fn update(&self) {
        let html = html::render(&self.config.title, &self.script);
        if let Err(e) = self.surface.set_html(html) {
            warn!("Failed to render result view: {}", e);
        }
    }

    /// Fire-and-forget delivery to the embedded content.
    pub fn post_message(&self, message: &OutboundMessage) {
        let value = match message.to_value() {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to encode {:?}: {}", message, e);
                return;
            }
        };

        if let Err(e) = self.surface.post_message(value) {
            warn!("Failed to post message to result view: {}", e);
        }
    }

    /// Release every owned resource once. Returns the failure count.
    fn release(&self) -> usize {
        if self.disposed.replace(true) {
            return 0;
        }
        // Take the store first: releasing may re-enter this panel.
        let mut store = std::mem::take(&mut *self.disposables.borrow_mut());
        store.dispose_all()
    }
}

/// Owner of the (at most one) live result panel.
pub struct PanelRegistry {
    current: RefCell<Option<Rc<ResultPanel>>>,
    config: Rc<PanelConfig>,
    broker: Rc<ValueBroker>,
}

impl PanelRegistry {
    pub fn new(config: PanelConfig, broker: Rc<ValueBroker>) -> Rc<Self> {
        Rc::new(Self {
            current: RefCell::new(None),
            config: Rc::new(config),
            broker,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn broker(&self) -> &Rc<ValueBroker> {
        &self.broker
    }

    /// The live panel, if any.
    pub fn current(&self) -> Option<Rc<ResultPanel>> {
        self.current.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Reveal the live panel, or create one beside the active editor.
    ///
    /// Only a failure to create the surface is returned; the layout switch
    /// is best effort.
    pub fn create_or_show(self: &Rc<Self>, host: &dyn WebviewHost) -> Result<(), HostError> {
        let column = host.active_column();

        if let Some(panel) = self.current() {
            debug!("Result view exists, revealing it");
            if let Err(e) = panel.surface.reveal(column) {
                warn!("Failed to reveal result view: {}", e);
            }
            return Ok(());
        }

        info!("Creating result view '{}'", self.config.view_type);
        let surface = host.create_webview_panel(
            &self.config.view_type,
            &self.config.title,
            ViewColumn::Beside,
            self.config.webview_options(),
        )?;

        if let Err(e) = host.execute_command(&self.config.layout_command, two_column_layout()) {
            warn!("Failed to switch to two-column layout: {}", e);
        }

        let panel = ResultPanel::attach(surface, self.config.clone(), self);
        *self.current.borrow_mut() = Some(panel);
        Ok(())
    }

    /// Adopt a surface the host restored after a restart.
    ///
    /// The serialized state is not used; the content asks for a snapshot once
    /// it is ready.
    pub fn revive(self: &Rc<Self>, surface: Rc<dyn WebviewSurface>, _state: Value) {
        info!("Reviving result view '{}'", surface.view_type());

        // The install location may differ from the one the surface was saved with.
        if let Err(e) = surface.set_options(self.config.webview_options()) {
            warn!("Failed to reset result view options: {}", e);
        }

        let panel = ResultPanel::attach(surface, self.config.clone(), self);
        let previous = self.current.borrow_mut().replace(panel);

        if let Some(previous) = previous {
            warn!("Revived result view replaces a live one, closing the old one");
            previous.release();
            if let Err(e) = previous.surface.dispose() {
                warn!("Failed to close replaced result view: {}", e);
            }
        }
    }

    /// Close the live panel from this side.
    pub fn dispose(&self) {
        let Some(panel) = self.current.borrow_mut().take() else {
            return;
        };

        if let Err(e) = panel.surface.dispose() {
            warn!("Failed to close result view: {}", e);
        }
        let failures = panel.release();
        debug!("Result view disposed ({} release failures)", failures);
    }

    /// Forget the live panel without closing it, so the host can restore it
    /// on its next start.
    pub fn detach(&self) {
        let Some(panel) = self.current.borrow_mut().take() else {
            return;
        };

        let failures = panel.release();
        debug!("Result view detached ({} release failures)", failures);
    }

    /// Post to the live panel; dropped when there is none.
    pub fn post_message(&self, message: OutboundMessage) {
        match self.current() {
            Some(panel) => panel.post_message(&message),
            None => debug!("No result view, dropping {:?}", message),
        }
    }

    fn handle_disposed(&self, panel: &Weak<ResultPanel>) {
        let Some(panel) = panel.upgrade() else {
            return;
        };

        {
            let mut current = self.current.borrow_mut();
            if current.as_ref().is_some_and(|c| Rc::ptr_eq(c, &panel)) {
                *current = None;
            }
        }

        let failures = panel.release();
        info!("Result view closed ({} release failures)", failures);
    }

    fn handle_message(&self, message: &Value) {
        match InboundMessage::parse(message) {
            Ok(InboundMessage::OnReady) => {
                debug!("Result view ready, sending snapshot");
                self.broker.emit_all();
            }
            Ok(InboundMessage::Unknown) => {
                debug!("Ignoring result view message {}", message);
            }
            Err(e) => {
                debug!("Malformed result view message {}: {}", message, e);
            }
        }
    }
}
