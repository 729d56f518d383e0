//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sieve: profile tabular data for quality problems
#[derive(Parser)]
#[command(name = "sieve")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile one or more data files and report anomalies
    Profile {
        /// Paths to the data files (CSV/TSV); each file is one table
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// JSON file with the duplicate-check exclusion policy
        #[arg(short, long, value_name = "POLICY")]
        exclude_config: Option<PathBuf>,

        /// Skip the duplicate check for a table (repeatable)
        #[arg(long, value_name = "TABLE")]
        skip_table: Vec<String>,

        /// Write the JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON report instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show what inference concludes about each column of a file
    Infer {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}
