//! ngcc CLI - compile installed packages into their module formats

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, MessageFormat};
use ngcc::util::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("ngcc=debug")
    } else if cli.quiet {
        EnvFilter::new("ngcc=error")
    } else {
        EnvFilter::new("ngcc=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    if cli.list {
        commands::list::execute(&cli, &shell)
    } else {
        commands::compile::execute(&cli, &shell)
    }
}
