//! Recording host fakes shared by the unit tests.

use crate::disposable::Disposable;
use crate::error::HostError;
use crate::event::Listeners;
use crate::host::{
    DisposeListener, MessageListener, ViewColumn, ViewStateListener, WebviewHost, WebviewOptions,
    WebviewSurface,
};
use crate::panel::PanelConfig;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub(crate) fn test_config() -> PanelConfig {
    PanelConfig {
        view_type: "powerquery.sdk.tools.ResultView".to_string(),
        title: "PQTest result".to_string(),
        extension_root: PathBuf::from("/ext"),
        script_dir: PathBuf::from("webviewDist"),
        script_file: "main.js".to_string(),
        retain_context_when_hidden: false,
        layout_command: "vscode.setEditorLayout".to_string(),
    }
}

pub(crate) struct FakeSurface {
    view_type: String,
    pub html: RefCell<Vec<String>>,
    pub posted: RefCell<Vec<Value>>,
    pub options: RefCell<Vec<WebviewOptions>>,
    pub reveals: Cell<usize>,
    /// Listener registrations released so far.
    pub released: Rc<Cell<usize>>,
    pub fail_posts: Cell<bool>,
    pub closed: Cell<bool>,
    visible: Cell<bool>,
    view_state: Listeners<dyn Fn(bool)>,
    disposed: Listeners<dyn Fn()>,
    messages: Listeners<dyn Fn(&Value)>,
}

impl FakeSurface {
    pub fn new(view_type: &str) -> Self {
        Self {
            view_type: view_type.to_string(),
            html: RefCell::new(Vec::new()),
            posted: RefCell::new(Vec::new()),
            options: RefCell::new(Vec::new()),
            reveals: Cell::new(0),
            released: Rc::new(Cell::new(0)),
            fail_posts: Cell::new(false),
            closed: Cell::new(false),
            visible: Cell::new(true),
            view_state: Listeners::new(),
            disposed: Listeners::new(),
            messages: Listeners::new(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.view_state.len() + self.disposed.len() + self.messages.len()
    }

    pub fn fire_view_state(&self, visible: bool) {
        self.visible.set(visible);
        for listener in self.view_state.snapshot() {
            listener(visible);
        }
    }

    pub fn fire_dispose(&self) {
        for listener in self.disposed.snapshot() {
            listener();
        }
    }

    pub fn fire_message(&self, message: Value) {
        for listener in self.messages.snapshot() {
            listener(&message);
        }
    }

    fn counted(&self, inner: Disposable) -> Disposable {
        let released = self.released.clone();
        Disposable::new(move || {
            released.set(released.get() + 1);
            inner.dispose()
        })
    }
}

impl WebviewSurface for FakeSurface {
    fn view_type(&self) -> &str {
        &self.view_type
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn reveal(&self, _column: Option<ViewColumn>) -> Result<(), HostError> {
        self.reveals.set(self.reveals.get() + 1);
        Ok(())
    }

    fn set_options(&self, options: WebviewOptions) -> Result<(), HostError> {
        self.options.borrow_mut().push(options);
        Ok(())
    }

    fn set_html(&self, html: String) -> Result<(), HostError> {
        self.html.borrow_mut().push(html);
        Ok(())
    }

    fn post_message(&self, message: Value) -> Result<(), HostError> {
        if self.fail_posts.get() {
            return Err(HostError::Rejected("post refused".to_string()));
        }
        self.posted.borrow_mut().push(message);
        Ok(())
    }

    fn as_webview_uri(&self, path: &Path) -> String {
        format!("fake-resource:{}", path.display())
    }

    fn dispose(&self) -> Result<(), HostError> {
        self.closed.set(true);
        self.fire_dispose();
        Ok(())
    }

    fn on_did_change_view_state(&self, listener: ViewStateListener) -> Disposable {
        self.counted(self.view_state.add(Rc::from(listener)))
    }

    fn on_did_dispose(&self, listener: DisposeListener) -> Disposable {
        self.counted(self.disposed.add(Rc::from(listener)))
    }

    fn on_did_receive_message(&self, listener: MessageListener) -> Disposable {
        self.counted(self.messages.add(Rc::from(listener)))
    }
}

pub(crate) struct FakeHost {
    surfaces: RefCell<Vec<Rc<FakeSurface>>>,
    created: RefCell<Vec<(String, ViewColumn, WebviewOptions)>>,
    pub commands: RefCell<Vec<(String, Value)>>,
    pub fail_commands: Cell<bool>,
    pub fail_create: Cell<bool>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            surfaces: RefCell::new(Vec::new()),
            created: RefCell::new(Vec::new()),
            commands: RefCell::new(Vec::new()),
            fail_commands: Cell::new(false),
            fail_create: Cell::new(false),
        }
    }

    pub fn created(&self) -> Vec<(String, ViewColumn, WebviewOptions)> {
        self.created.borrow().clone()
    }

    pub fn last_surface(&self) -> Option<Rc<FakeSurface>> {
        self.surfaces.borrow().last().cloned()
    }
}

impl WebviewHost for FakeHost {
    fn active_column(&self) -> Option<ViewColumn> {
        Some(ViewColumn::Number(1))
    }

    fn create_webview_panel(
        &self,
        view_type: &str,
        _title: &str,
        column: ViewColumn,
        options: WebviewOptions,
    ) -> Result<Rc<dyn WebviewSurface>, HostError> {
        if self.fail_create.get() {
            return Err(HostError::Rejected("no window".to_string()));
        }

        self.created
            .borrow_mut()
            .push((view_type.to_string(), column, options));
        let surface = Rc::new(FakeSurface::new(view_type));
        self.surfaces.borrow_mut().push(surface.clone());
        Ok(surface)
    }

    fn execute_command(&self, command: &str, args: Value) -> Result<(), HostError> {
        if self.fail_commands.get() {
            return Err(HostError::Command {
                command: command.to_string(),
                reason: "layout locked".to_string(),
            });
        }
        self.commands.borrow_mut().push((command.to_string(), args));
        Ok(())
    }
}
