//! Named command handlers invoked by the editor.

use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

pub type CommandHandler = Box<dyn Fn(Value)>;

#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `id`, replacing any previous one.
    pub fn register<F>(&mut self, id: &str, handler: F)
    where
        F: Fn(Value) + 'static,
    {
        if self.handlers.insert(id.to_string(), Box::new(handler)).is_some() {
            warn!("Command '{}' registered twice, keeping the latest", id);
        }
    }

    /// Run a command. Returns false when nothing is registered under `id`.
    pub fn execute(&self, id: &str, args: Value) -> bool {
        match self.handlers.get(id) {
            Some(handler) => {
                debug!("Executing command '{}'", id);
                handler(args);
                true
            }
            None => {
                warn!("Unknown command '{}'", id);
                false
            }
        }
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
