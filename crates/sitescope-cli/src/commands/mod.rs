//! Command implementations

mod analyze;
mod config;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &output),
        Commands::Config(args) => config::execute(args, &output),
    }
}
