//! pqtest-view - PQTest result view for the Power Query SDK editor integration
//!
//! Runs next to the editor and speaks newline-delimited JSON over stdio.
//! Single event loop; stdin is read on its own thread.

mod commands;
mod config;
mod constants;
mod extension;
mod stdio_host;

use config::Config;
use env_logger::{Env, Target};
use extension::Extension;
use log::info;
use std::error::Error;
use std::rc::Rc;
use stdio_host::{Outbox, StdioHost};
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .target(Target::Stderr)
        .init();

    info!("Starting pqtest-view...");
    info!("Extension root: {:?}", config.extension_root);

    let (tx, mut rx) = mpsc::unbounded_channel();
    stdio_host::spawn_reader(tx);

    let host = Rc::new(StdioHost::new(Outbox::stdout()));
    let extension = Extension::activate(&config, host);

    while let Some(event) = rx.recv().await {
        if extension.handle_event(event).is_break() {
            break;
        }
    }

    extension.deactivate();
    info!("pqtest-view stopped.");

    Ok(())
}
