//! Process → editor requests, one JSON object per stdout line.

use pq_webview::{HostError, ViewColumn, WebviewOptions};
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

#[derive(Debug, Serialize)]
#[serde(tag = "request", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostRequest<'a> {
    RegisterCommand {
        command: &'a str,
    },
    /// Ask the editor to hand back panels of this type after a restart.
    RegisterPanelSerializer {
        view_type: &'a str,
    },
    CreatePanel {
        panel_id: &'a str,
        view_type: &'a str,
        title: &'a str,
        column: ViewColumn,
        options: &'a WebviewOptions,
    },
    RevealPanel {
        panel_id: &'a str,
        column: Option<ViewColumn>,
    },
    SetOptions {
        panel_id: &'a str,
        options: &'a WebviewOptions,
    },
    SetHtml {
        panel_id: &'a str,
        html: &'a str,
    },
    PostMessage {
        panel_id: &'a str,
        message: &'a Value,
    },
    DisposePanel {
        panel_id: &'a str,
    },
    ExecuteCommand {
        command: &'a str,
        args: &'a Value,
    },
}

/// Shared line-oriented writer for requests.
#[derive(Clone)]
pub struct Outbox {
    writer: Rc<RefCell<Box<dyn Write>>>,
}

impl Outbox {
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer: Rc::new(RefCell::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Write one request line and flush it.
    pub fn send(&self, request: &HostRequest<'_>) -> Result<(), HostError> {
        let mut writer = self.writer.borrow_mut();
        serde_json::to_writer(&mut *writer, request)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
