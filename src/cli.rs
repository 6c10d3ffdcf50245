//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `signup`.
#[derive(Debug, Parser)]
#[command(
    name = "signup",
    version,
    about = "Drive the reactive signup form from a terminal"
)]
pub struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a scripted form session and print every output change as JSON.
    Session {
        /// YAML file listing the form events.
        script: PathBuf,
        /// How long to keep observing after the last event, in milliseconds.
        #[arg(long, default_value_t = 1500)]
        settle_ms: u64,
        /// Probability in 0.0..=1.0 that the mock signup fails.
        #[arg(long)]
        failure_rate: Option<f64>,
    },
    /// Run the field validators once and print their labels.
    Validate {
        /// Username to check (queries the mock backend).
        #[arg(long)]
        username: Option<String>,
        /// Password to check.
        #[arg(long)]
        password: Option<String>,
        /// Repeated password, compared against `--password`.
        #[arg(long)]
        repeated: Option<String>,
    },
}
