//! Extension composition: broker, result view and commands wired to a host.

use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::constants;
use crate::stdio_host::{HostEvent, StdioHost};
use log::{error, info, warn};
use pq_broker::ValueBroker;
use pq_webview::{PanelRegistry, ResultViewBridge};
use std::ops::ControlFlow;
use std::rc::Rc;

/// Everything that lives between activation and shutdown.
pub struct Extension {
    host: Rc<StdioHost>,
    broker: Rc<ValueBroker>,
    registry: Rc<PanelRegistry>,
    bridge: ResultViewBridge,
    commands: CommandRegistry,
}

impl Extension {
    /// Build the result view subsystem and announce it to the editor.
    pub fn activate(config: &Config, host: Rc<StdioHost>) -> Self {
        info!("Activating {}...", constants::EXTENSION_ID);

        let broker = Rc::new(ValueBroker::new(constants::VALUE_SLOTS.iter().copied()));
        let registry = PanelRegistry::new(config.panel_config(), broker.clone());

        // Relay must be attached before anything is emitted.
        let bridge = ResultViewBridge::new(registry.clone());
        bridge.activate();

        let mut commands = CommandRegistry::new();
        let show_host = host.clone();
        let show_registry = registry.clone();
        commands.register(constants::SHOW_RESULT_VIEW_COMMAND, move |_args| {
            if let Err(e) = show_registry.create_or_show(show_host.as_ref()) {
                error!("Failed to open result view: {}", e);
            }
        });

        for id in commands.ids() {
            if let Err(e) = host.register_command(id) {
                warn!("Failed to register command '{}': {}", id, e);
            }
        }
        if let Err(e) = host.register_panel_serializer(constants::RESULT_VIEW_TYPE) {
            warn!("Failed to register result view serializer: {}", e);
        }

        Self {
            host,
            broker,
            registry,
            bridge,
            commands,
        }
    }

    /// Apply one host event. `Break` means the host asked us to stop.
    pub fn handle_event(&self, event: HostEvent) -> ControlFlow<()> {
        match event {
            HostEvent::ExecuteCommand { command, args } => {
                self.commands.execute(&command, args);
            }
            HostEvent::RevivePanel {
                panel_id,
                view_type,
                state,
            } => {
                if view_type != constants::RESULT_VIEW_TYPE {
                    warn!("Cannot revive panel of type '{}'", view_type);
                } else if let Some(surface) = self.host.adopt(panel_id, view_type) {
                    self.registry.revive(surface, state);
                }
            }
            HostEvent::ActiveEditorChanged { column } => {
                self.host.set_active_column(column);
            }
            HostEvent::ViewStateChanged { panel_id, visible } => {
                self.host.view_state_changed(&panel_id, visible);
            }
            HostEvent::PanelDisposed { panel_id } => {
                self.host.panel_disposed(&panel_id);
            }
            HostEvent::PanelMessage { panel_id, message } => {
                self.host.panel_message(&panel_id, &message);
            }
            HostEvent::SetValue { property, value } => {
                if self.broker.contains(&property) {
                    self.broker.set(&property, value);
                } else {
                    warn!("Ignoring value for unknown slot '{}'", property);
                }
            }
            HostEvent::Shutdown => {
                info!("Shutdown requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Detach the result view and the relay. The view stays open so the
    /// editor can restore it next time.
    pub fn deactivate(&self) {
        self.registry.detach();
        self.bridge.deactivate();
        info!("Extension deactivated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdio_host::Outbox;
    use crate::stdio_host::tests::SharedBuffer;
    use serde_json::{Value, json};

    fn activate() -> (Extension, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let outbox = Outbox::new(Box::new(buffer.clone()));
        let host = Rc::new(StdioHost::with_session(outbox, "test".to_string()));
        let config = Config {
            extension_root: "/ext".into(),
            ..Config::default()
        };
        (Extension::activate(&config, host), buffer)
    }

    fn show() -> HostEvent {
        HostEvent::ExecuteCommand {
            command: constants::SHOW_RESULT_VIEW_COMMAND.to_string(),
            args: Value::Null,
        }
    }

    fn requests(buffer: &SharedBuffer, kind: &str) -> Vec<Value> {
        buffer
            .lines()
            .into_iter()
            .filter(|l| l["request"] == kind)
            .collect()
    }

    #[test]
    fn test_activation_announces_command_and_serializer() {
        let (_ext, buffer) = activate();

        assert_eq!(
            buffer.lines(),
            vec![
                json!({"request": "registerCommand", "command": "powerquery.sdk.tools.ShowResultView"}),
                json!({"request": "registerPanelSerializer", "viewType": "powerquery.sdk.tools.ResultView"}),
            ]
        );
    }

    #[test]
    fn test_show_twice_creates_one_panel() {
        let (ext, buffer) = activate();

        assert!(ext.handle_event(show()).is_continue());
        assert!(ext.handle_event(show()).is_continue());

        assert_eq!(requests(&buffer, "createPanel").len(), 1);
        assert_eq!(requests(&buffer, "revealPanel").len(), 1);
        assert_eq!(requests(&buffer, "setHtml").len(), 1);

        let layout = requests(&buffer, "executeCommand");
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0]["command"], "vscode.setEditorLayout");
    }

    #[test]
    fn test_result_flows_to_panel() {
        let (ext, buffer) = activate();
        ext.handle_event(show());

        ext.handle_event(HostEvent::SetValue {
            property: constants::LATEST_PQTEST_RESULT.to_string(),
            value: json!({"ok": true}),
        });

        assert_eq!(
            requests(&buffer, "postMessage"),
            vec![json!({
                "request": "postMessage",
                "panelId": "panel-test-1",
                "message": {
                    "type": "OnOneValueUpdated",
                    "payload": {"property": "latestPqTestResult", "value": {"ok": true}}
                }
            })]
        );
    }

    #[test]
    fn test_ready_message_replays_snapshot() {
        let (ext, buffer) = activate();
        ext.handle_event(HostEvent::SetValue {
            property: constants::LATEST_PQTEST_RESULT.to_string(),
            value: json!({"failed": 1}),
        });
        ext.handle_event(show());
        assert!(requests(&buffer, "postMessage").is_empty());

        ext.handle_event(HostEvent::PanelMessage {
            panel_id: "panel-test-1".to_string(),
            message: json!({"type": "onReady"}),
        });
        ext.handle_event(HostEvent::PanelMessage {
            panel_id: "panel-test-1".to_string(),
            message: json!({"type": "somethingElse"}),
        });

        let posted = requests(&buffer, "postMessage");
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0]["message"]["payload"]["value"], json!({"failed": 1}));
    }

    #[test]
    fn test_close_then_show_creates_fresh_panel() {
        let (ext, buffer) = activate();
        ext.handle_event(show());

        ext.handle_event(HostEvent::PanelDisposed {
            panel_id: "panel-test-1".to_string(),
        });
        ext.handle_event(show());

        let created = requests(&buffer, "createPanel");
        assert_eq!(created.len(), 2);
        assert_eq!(created[1]["panelId"], "panel-test-2");
        assert!(requests(&buffer, "revealPanel").is_empty());
    }

    #[test]
    fn test_hidden_then_visible_rerenders() {
        let (ext, buffer) = activate();
        ext.handle_event(show());

        ext.handle_event(HostEvent::ViewStateChanged {
            panel_id: "panel-test-1".to_string(),
            visible: false,
        });
        ext.handle_event(HostEvent::ViewStateChanged {
            panel_id: "panel-test-1".to_string(),
            visible: true,
        });

        assert_eq!(requests(&buffer, "setHtml").len(), 2);
    }

    #[test]
    fn test_revive_adopts_restored_panel() {
        let (ext, buffer) = activate();

        ext.handle_event(HostEvent::RevivePanel {
            panel_id: "restored".to_string(),
            view_type: constants::RESULT_VIEW_TYPE.to_string(),
            state: json!({"old": true}),
        });
        ext.handle_event(show());

        let options = requests(&buffer, "setOptions");
        assert_eq!(options.len(), 1);
        assert_eq!(
            options[0]["options"]["localResourceRoots"],
            json!(["/ext/webviewDist"])
        );
        assert!(requests(&buffer, "createPanel").is_empty());
        assert_eq!(requests(&buffer, "revealPanel")[0]["panelId"], "restored");
    }

    #[test]
    fn test_revive_of_foreign_view_type_is_ignored() {
        let (ext, buffer) = activate();

        ext.handle_event(HostEvent::RevivePanel {
            panel_id: "other".to_string(),
            view_type: "someone.else".to_string(),
            state: Value::Null,
        });

        assert!(requests(&buffer, "setOptions").is_empty());
        assert!(!ext.registry.is_active());
    }

    #[test]
    fn test_unknown_slot_and_command_are_ignored() {
        let (ext, buffer) = activate();

        ext.handle_event(HostEvent::SetValue {
            property: "nope".to_string(),
            value: json!(1),
        });
        ext.handle_event(HostEvent::ExecuteCommand {
            command: "nope".to_string(),
            args: Value::Null,
        });

        assert_eq!(buffer.lines().len(), 2);
    }

    #[test]
    fn test_revive_closes_panel_it_replaces() {
        let (ext, buffer) = activate();
        ext.handle_event(show());

        ext.handle_event(HostEvent::RevivePanel {
            panel_id: "restored".to_string(),
            view_type: constants::RESULT_VIEW_TYPE.to_string(),
            state: Value::Null,
        });
        ext.handle_event(HostEvent::SetValue {
            property: constants::LATEST_PQTEST_RESULT.to_string(),
            value: json!({"ok": true}),
        });

        assert_eq!(
            requests(&buffer, "disposePanel"),
            vec![json!({"request": "disposePanel", "panelId": "panel-test-1"})]
        );
        let posted = requests(&buffer, "postMessage");
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0]["panelId"], "restored");
        assert_eq!(ext.host.panel_count(), 1);
    }

    #[test]
    fn test_revive_of_live_panel_id_is_ignored() {
        let (ext, buffer) = activate();
        ext.handle_event(show());

        ext.handle_event(HostEvent::RevivePanel {
            panel_id: "panel-test-1".to_string(),
            view_type: constants::RESULT_VIEW_TYPE.to_string(),
            state: Value::Null,
        });

        assert!(requests(&buffer, "setOptions").is_empty());
        assert!(requests(&buffer, "disposePanel").is_empty());
        assert_eq!(ext.host.panel_count(), 1);

        ext.handle_event(HostEvent::PanelMessage {
            panel_id: "panel-test-1".to_string(),
            message: json!({"type": "onReady"}),
        });
        assert_eq!(requests(&buffer, "postMessage").len(), 1);

        ext.handle_event(HostEvent::PanelDisposed {
            panel_id: "panel-test-1".to_string(),
        });
        assert!(!ext.registry.is_active());
        assert_eq!(ext.host.panel_count(), 0);
    }

    #[test]
    fn test_shutdown_breaks_and_deactivate_leaves_panel_open() {
        let (ext, buffer) = activate();
        ext.handle_event(show());

        assert!(ext.handle_event(HostEvent::Shutdown).is_break());
        ext.deactivate();

        assert!(requests(&buffer, "disposePanel").is_empty());
        assert!(!ext.registry.is_active());
        assert_eq!(ext.host.panel_count(), 1);
        assert_eq!(ext.broker.subscriber_count(constants::LATEST_PQTEST_RESULT), 0);

        ext.handle_event(HostEvent::SetValue {
            property: constants::LATEST_PQTEST_RESULT.to_string(),
            value: json!(1),
        });
        assert!(requests(&buffer, "postMessage").is_empty());
    }
}
