use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use strack::cli::args::{Cli, Commands};
use strack::cli::commands;
use strack::error::StrackError;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), StrackError> {
    let cli = Cli::parse();
    let format = cli.output;

    let output = match cli.command {
        Commands::Add(args) => commands::add(&args, format)?,
        Commands::List(args) => commands::list(&args, format)?,
        Commands::Done { id } => commands::done(id, format)?,
        Commands::Session(args) => commands::session(args.command, format)?,
        Commands::Sync(args) => commands::sync(args.command, format)?,
        Commands::Report(args) => commands::report(&args, format)?,
        Commands::Export(args) => commands::export(&args, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
