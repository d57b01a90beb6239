//! Distill CLI - Extract decision-critical statements from documents.

use anyhow::Context;
use clap::Parser;
use distill_cli::commands;
use distill_cli::{Cli, Command, Config, Formatter};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config; a broken default file falls back to defaults
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let config = match &cli.config {
        Some(path) => {
            Config::load_from(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::load().unwrap_or_else(|e| {
            warn!("Ignoring {}: {}", config_path.display(), e);
            Config::default()
        }),
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Compress(args) => {
            commands::execute_compress(args, &config.engine, &formatter)?;
        }
        Command::Summary(args) => {
            commands::execute_summary(args, &config.engine, &formatter)?;
        }
        Command::Contradictions(args) => {
            commands::execute_contradictions(args, &config.engine, &formatter)?;
        }
        Command::Trace(args) => {
            commands::execute_trace(args, &config.engine, &formatter)?;
        }
        Command::Compare(args) => {
            commands::execute_compare(args, &config.engine, &formatter)?;
        }
        Command::Batch(args) => {
            commands::execute_batch(args, &config.engine, &formatter).await?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
