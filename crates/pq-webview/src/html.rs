//! Bootstrap document loaded into the result surface.

use crate::host::WebviewSurface;
use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Hex chars of the script digest appended as `?v=`.
const CONTENT_HASH_LEN: usize = 16;

/// Short SHA-256 of the file at `path`, or `None` if it can't be read.
pub fn content_hash(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => {
            let digest = hex::encode(Sha256::digest(&bytes));
            Some(digest[..CONTENT_HASH_LEN].to_string())
        }
        Err(e) => {
            debug!("Cannot hash script {:?}: {}", path, e);
            None
        }
    }
}

/// Surface-addressable reference to the bundled script, content addressed
/// when the script is readable.
pub fn script_reference(surface: &dyn WebviewSurface, script_path: &Path) -> String {
    let uri = surface.as_webview_uri(script_path);
    match content_hash(script_path) {
        Some(hash) => format!("{}?v={}", uri, hash),
        None => uri,
    }
}

/// Render the minimal document that mounts `script`, a reference from
/// [`script_reference`].
pub fn render(title: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{}</title>
</head>
<body>
    <div id="root"></div>
    <script src="{}"></script>
</body>
</html>
"#,
        escape(title),
        escape(script)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
