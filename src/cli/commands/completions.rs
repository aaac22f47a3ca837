//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::args::Cli;
use crate::error::StrackError;

/// Generate completion scripts for the given shell on stdout.
pub fn completions(shell: Shell) -> Result<String, StrackError> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "strack", &mut std::io::stdout());
    Ok(String::new())
}
