//! ccinvoke CLI - overflow-safe compiler invocation

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ccinvoke::util::diagnostic;
use ccinvoke::CompileError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        std::process::exit(report(&e, color));
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("ccinvoke=debug")
    } else {
        EnvFilter::new("ccinvoke=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile(args) => commands::compile::execute(args),
        Commands::Args(args) => commands::args::execute(args),
        Commands::Render(args) => commands::render::execute(args),
        Commands::Compdb(args) => commands::compdb::execute(args),
    }
}

/// Print `e` and pick the process exit code.
fn report(e: &anyhow::Error, color: bool) -> i32 {
    match e.downcast_ref::<CompileError>() {
        // The compiler's own output has already been forwarded
        Some(err @ CompileError::CompilationFailed { exit_code, .. }) => {
            eprintln!("error: {}", err);
            exit_code.filter(|&code| code != 0).unwrap_or(1)
        }
        Some(err) => {
            diagnostic::emit(&err.to_diagnostic(), color);
            1
        }
        None => {
            eprintln!("error: {:#}", e);
            1
        }
    }
}
