//! Plugin execution engine — a controlled envelope around externally
//! supplied plugin artifacts.
//!
//! The crate composes integrity verification (HMAC-SHA256), optional
//! end-to-end payload encryption (AES-GCM), isolated dynamic loading,
//! bounded-timeout invocation, and deterministic Base64 output encoding
//! into a single [`orchestrator::Orchestrator::process`] call.

pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod loader;
pub mod model;
pub mod orchestrator;
pub mod provider;
mod secret;

use orchestrator::DefaultOrchestrator;

/// Embedded entry point: runs the full pipeline against three JSON
/// section strings and returns the encoded result or a pipeline failure
/// string. Never panics and never returns an `Err` — see `model::PluginResult`
/// and `error::EngineError` for the internal taxonomy this collapses.
#[must_use]
pub fn execute(meta_json: &str, input_json: &str, settings_json: &str) -> String {
    match DefaultOrchestrator::from_env() {
        Ok(orchestrator) => orchestrator.process(meta_json, input_json, settings_json),
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize orchestrator");
            "plugin verification failed".to_string()
        }
    }
}
