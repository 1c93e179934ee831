mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// A content-addressed version-control engine.
#[derive(Debug, Parser)]
#[command(name = "ugit", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("UGIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            eprintln!("ugit: could not determine the current directory: {e}");
            std::process::exit(1);
        }
    };

    if let Err(err) = commands::dispatch(&cwd, cli.command) {
        eprintln!("ugit: {err}");
        std::process::exit(1);
    }
}
