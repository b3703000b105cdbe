//! Error types for pq-webview

/// Failures reported by the host platform.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Panel already disposed")]
    Disposed,

    #[error("Command '{command}' failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Request rejected by host: {0}")]
    Rejected(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
