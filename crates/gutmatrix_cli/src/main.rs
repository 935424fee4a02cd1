//! Operator CLI for the GUT scoring core.
//!
//! # Responsibility
//! - Map command-line input onto registry, vote and report services.
//! - Keep presentation formatting out of `gutmatrix_core`.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging_from_cli(&cli)?;
    commands::run(cli)
}
