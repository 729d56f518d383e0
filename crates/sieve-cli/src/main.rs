//! Sieve CLI - profile tabular data for quality problems.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Profile {
            files,
            exclude_config,
            skip_table,
            output,
            json,
        } => commands::profile::run(files, exclude_config, skip_table, output, json),

        Commands::Infer { file } => commands::infer::run(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
