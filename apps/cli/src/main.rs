//! ResumeForge CLI: tailored résumé generation tool.
//!
//! Builds one PDF per combination (or permutation) of project fragments by
//! substituting them into a LaTeX template and compiling each variant.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
