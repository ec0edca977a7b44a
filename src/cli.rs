//! Command-line argument parsing: zero or three trailing JSON arguments.

use anyhow::{bail, Context, Result};
use clap::Parser;

/// Runs a plugin through the execution pipeline.
///
/// With no arguments, reads a single JSON object from stdin whose
/// `meta`/`input`/`settings` keys are the three sections. With three
/// arguments, each is the JSON for one section, in that order.
#[derive(Parser)]
#[command(name = "plugin-exec-engine", version, about)]
pub struct Cli {
    /// `meta input settings`, or omit all three to read from stdin.
    pub sections: Vec<String>,
}

impl Cli {
    /// Validates the positional argument count is 0 or 3 and, if 3,
    /// returns them in `(meta, input, settings)` order.
    pub fn sections(self) -> Result<Option<(String, String, String)>> {
        match self.sections.len() {
            0 => Ok(None),
            3 => {
                let mut sections = self.sections.into_iter();
                Ok(Some((
                    sections.next().expect("checked len == 3"),
                    sections.next().expect("checked len == 3"),
                    sections.next().expect("checked len == 3"),
                )))
            }
            n => bail!("expected 0 or 3 arguments, got {n}"),
        }
    }
}

/// Splits a single stdin JSON object into its three sections. A missing
/// section defaults to an empty object.
pub fn split_stdin_payload(raw: &str) -> Result<(String, String, String)> {
    let value: serde_json::Value = serde_json::from_str(raw).context("stdin payload is not valid JSON")?;
    let section = |key: &str| {
        value
            .get(key)
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()))
            .to_string()
    };
    Ok((section("meta"), section("input"), section("settings")))
}
