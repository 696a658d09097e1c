//! Klistra CLI - encrypted, self-destructing pastes from the terminal
//!
//! Thin front end over `klistra-core`: each invocation opens the paste
//! database, runs one command, and exits.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, maintenance, misc, paste};
use crate::errors::{exit_code_for, hint_for};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = hint_for(&e) {
            eprintln!("{}", hint);
        }
        std::process::exit(exit_code_for(&e));
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        return misc::handle_completions(*shell);
    }

    let ctx = AppContext::new(cli)?;
    match &cli.command {
        Commands::Init(args) => init::handle_init(&ctx, args),
        Commands::Create(args) => paste::handle_create(&ctx, args),
        Commands::Read(args) => paste::handle_read(&ctx, args),
        Commands::Status(args) => paste::handle_status(&ctx, args),
        Commands::Sweep => maintenance::handle_sweep(&ctx),
        Commands::Daemon(args) => maintenance::handle_daemon(&ctx, args),
        Commands::Completions { shell } => misc::handle_completions(*shell),
    }
}
