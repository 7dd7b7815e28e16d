//! JSON output helpers for `--json` mode.

use anyhow::{Context, Result};

/// Format a local (client-side) failure as a JSON error object.
///
/// ```json
/// { "error": "client_error", "message": "..." }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": "client_error",
        "message": message,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any JSON value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn pretty(value: &serde_json::Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}
