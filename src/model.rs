//! Invocation request data model.
//!
//! `Meta` is the only strictly-typed section; `input` and `settings` are
//! intentionally free-form `serde_json::Map`s — the engine only ever reads
//! a small number of well-known keys out of each (`input.data`,
//! `settings.timeoutMs`), and must pass everything else through to the
//! plugin untouched.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Plugin identity and envelope flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub plugin_name: String,
    /// Entry-symbol identifier inside the artifact. Absent from the wire
    /// payload is a valid (if useless) shape — the loader, not this
    /// deserialization step, is responsible for classifying an empty
    /// value as a failure.
    #[serde(default)]
    pub plugin_main_class: String,
    pub file_location: String,
    #[serde(default)]
    pub encrypted_input: bool,
    #[serde(default)]
    pub encrypt_output: bool,
    #[serde(default)]
    pub url_safe_output: bool,
}

/// Free-form `input` section. The Orchestrator only ever rewrites the
/// `data` field, and only when `meta.encryptedInput` is set.
pub type Input = Map<String, Value>;

/// Free-form `settings` section. The Orchestrator only reads `timeoutMs`.
pub type Settings = Map<String, Value>;

/// Result of a plugin invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginResult {
    /// Successful return with the plugin's raw output bytes.
    Ok(Vec<u8>),
    /// A deterministic failure; `reason` matches one of the loader's
    /// fixed classification strings.
    Error(String),
    /// Execution exceeded the allotted wall-clock budget.
    Timeout,
}

/// Reads `settings.timeoutMs` as a non-negative integer, if present and
/// well-formed. Anything else (missing, wrong type, negative) is silently
/// ignored so the caller falls through to the next priority tier — this
/// function never surfaces a parse error.
#[must_use]
pub fn timeout_ms_from_settings(settings: &Settings) -> Option<i64> {
    settings.get("timeoutMs").and_then(Value::as_i64)
}

/// Reads `input.data` as a string, if present.
#[must_use]
pub fn data_field(input: &Input) -> Option<&str> {
    input.get("data").and_then(Value::as_str)
}

/// Rewrites `input.data` in place. All other keys in `input` are left
/// untouched.
pub fn set_data_field(input: &mut Input, value: String) {
    input.insert("data".to_string(), Value::String(value));
}
