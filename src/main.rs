// ABOUTME: Main entry point for the repostate probe binary
//
// Binary: repostate
// Usage: repostate [--repo PATH] [--format text|json] <COMMAND>
// - root / branch / sha / upstream / hash: single values
// - changed: files changed since a reference
// - tracked / ignored: classify paths
// - watch: stream branch changes until Ctrl-C

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;

use repostate::cli::{self, Cli, Commands, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(args.log_format);

    let repo = cli::open_repository(&args)?;

    match &args.command {
        Commands::Watch => cli::watch::execute(repo, args.format).await,
        command => {
            let output = cli::query::execute(&*repo, command, args.format)?;
            if !output.is_empty() {
                println!("{output}");
            }
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only query results
fn setup_logging(format: OutputFormat) {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "repostate=info".into());

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        OutputFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_ansi(false))
            .with(filter)
            .init(),
        OutputFormat::Text => tracing_subscriber::registry().with(layer).with(filter).init(),
    }
}
