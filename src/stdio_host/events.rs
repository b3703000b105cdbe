//! Editor → process events, one JSON object per stdin line.

use log::{debug, error, info, warn};
use pq_webview::ViewColumn;
use serde::Deserialize;
use serde_json::Value;
use std::io::{self, BufRead};
use std::thread;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostEvent {
    /// A command id was invoked from the editor.
    ExecuteCommand {
        command: String,
        #[serde(default)]
        args: Value,
    },
    /// The editor restored a serialized panel after a restart.
    RevivePanel {
        panel_id: String,
        view_type: String,
        #[serde(default)]
        state: Value,
    },
    ActiveEditorChanged { column: Option<ViewColumn> },
    ViewStateChanged { panel_id: String, visible: bool },
    PanelDisposed { panel_id: String },
    /// The embedded content posted a message.
    PanelMessage { panel_id: String, message: Value },
    /// The test runner produced a new value for a broker slot.
    SetValue { property: String, value: Value },
    Shutdown,
}

/// Parse one input line. Blank and malformed lines yield `None`.
pub fn parse_line(line: &str) -> Option<HostEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Ignoring malformed host event: {}", e);
            None
        }
    }
}

/// Forward every event read from `reader` until EOF or the receiver is gone.
pub fn read_events<R: BufRead>(reader: R, tx: &UnboundedSender<HostEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read host event: {}", e);
                break;
            }
        };

        if let Some(event) = parse_line(&line) {
            if tx.send(event).is_err() {
                debug!("Event loop gone, stopping reader");
                break;
            }
        }
    }
}

/// Start the stdin reader thread. The channel closes when stdin does.
pub fn spawn_reader(tx: UnboundedSender<HostEvent>) -> thread::JoinHandle<()> {
    info!("Starting host event reader...");

    thread::spawn(move || {
        let stdin = io::stdin();
        read_events(stdin.lock(), &tx);
        info!("Host event stream closed");
    })
}
