//! Replays JSON-lines console scripts through a configured console.

mod config;
mod script;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::ShellConfig;

#[derive(Parser)]
#[command(name = "hostconsole-shell", version, about = "Replay console calls from a script")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Script to replay, one JSON call per line. Reads stdin when omitted.
    script: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never interleave with console stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ShellConfig::default(),
    };
    let mut console = config.build_console()?;

    let summary = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            script::run(&mut console, BufReader::new(file))?
        }
        None => script::run(&mut console, io::stdin().lock())?,
    };

    tracing::info!(
        calls = summary.calls,
        failures = summary.failures,
        "script finished"
    );
    Ok(())
}
