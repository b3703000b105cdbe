//! Runtime configuration.
//!
//! Lookup order: `$PQTEST_VIEW_CONFIG`, then `<config dir>/pqtest-view/config.json`,
//! then built-in defaults. `$PQTEST_VIEW_ROOT` overrides the extension root.

use crate::constants;
use log::debug;
use pq_webview::PanelConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Install location of the extension (holds the bundled web content).
    pub extension_root: PathBuf,
    pub script_dir: PathBuf,
    pub script_file: String,
    pub panel_title: String,
    pub retain_context_when_hidden: bool,
    /// Default log filter; `RUST_LOG` wins when set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension_root: PathBuf::from("."),
            script_dir: PathBuf::from(constants::WEBVIEW_SCRIPT_DIR),
            script_file: constants::WEBVIEW_SCRIPT_FILE.to_string(),
            panel_title: constants::RESULT_VIEW_TITLE.to_string(),
            retain_context_when_hidden: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from the usual locations and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Ok(root) = std::env::var(constants::EXTENSION_ROOT_ENV) {
            if !root.is_empty() {
                config.extension_root = PathBuf::from(root);
            }
        }

        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            view_type: constants::RESULT_VIEW_TYPE.to_string(),
            title: self.panel_title.clone(),
            extension_root: self.extension_root.clone(),
            script_dir: self.script_dir.clone(),
            script_file: self.script_file.clone(),
            retain_context_when_hidden: self.retain_context_when_hidden,
            layout_command: constants::SET_EDITOR_LAYOUT_COMMAND.to_string(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    match std::env::var(constants::CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| {
            dir.join(constants::CONFIG_DIR_NAME)
                .join(constants::CONFIG_FILE_NAME)
        }),
    }
}
