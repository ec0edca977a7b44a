mod allocator;

use std::io::Read as _;
use std::process;

use clap::Parser;

use plugin_exec_engine::cli::{self, Cli};

/// Entry point. Reads the three JSON sections from either the positional
/// arguments or stdin, runs the pipeline, and writes the result.
///
/// # Exit Codes
/// * 0 - Pipeline ran to completion (success or a reported pipeline failure)
/// * 1 - Argument arity violation or stdin is not readable/valid JSON
fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let sections = match Cli::parse().sections() {
        Ok(sections) => sections,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let (meta, input, settings) = match sections {
        Some(triple) => triple,
        None => match read_stdin() {
            Ok(triple) => triple,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
    };

    println!("{}", plugin_exec_engine::execute(&meta, &input, &settings));
}

fn read_stdin() -> anyhow::Result<(String, String, String)> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    cli::split_stdin_payload(&raw)
}
