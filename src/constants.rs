//! Static identifiers shared with the editor side.

/// Marketplace id of the extension this process serves.
pub const EXTENSION_ID: &str = "PowerQuery.vscode-powerquery-sdk";

/// Opens (or focuses) the result view.
pub const SHOW_RESULT_VIEW_COMMAND: &str = "powerquery.sdk.tools.ShowResultView";
/// Editor command used to split into two columns.
pub const SET_EDITOR_LAYOUT_COMMAND: &str = "vscode.setEditorLayout";

/// View type under which the host serializes the result panel.
pub const RESULT_VIEW_TYPE: &str = "powerquery.sdk.tools.ResultView";
pub const RESULT_VIEW_TITLE: &str = "PQTest result";

/// Bundled web content, relative to the extension root.
pub const WEBVIEW_SCRIPT_DIR: &str = "webviewDist";
pub const WEBVIEW_SCRIPT_FILE: &str = "main.js";

/// Latest PQTest run output, relayed verbatim.
pub const LATEST_PQTEST_RESULT: &str = "latestPqTestResult";
/// Every broker slot, in snapshot order.
pub const VALUE_SLOTS: &[&str] = &[LATEST_PQTEST_RESULT];

// Environment / config file lookup
pub const CONFIG_PATH_ENV: &str = "PQTEST_VIEW_CONFIG";
pub const EXTENSION_ROOT_ENV: &str = "PQTEST_VIEW_ROOT";
pub const CONFIG_DIR_NAME: &str = "pqtest-view";
pub const CONFIG_FILE_NAME: &str = "config.json";
