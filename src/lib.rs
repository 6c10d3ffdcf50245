//! Reactive signup form engine.
//!
//! Keystrokes and button taps enter a [`flow::SignupFlow`] as streams and
//! come out as shared, replaying signals: per-field validation, whether the
//! signup button is enabled, whether a signup is in flight and its outcome.
//! Collaborators (signup API, validation rules, prompts) are traits in
//! [`ports`] with implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod flow;
pub mod logging;
pub mod ports;
pub mod reactive;
pub mod script;
pub mod validation;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => return Err(err.to_string()),
        },
    };
    logging::init(cli.verbose);
    commands::dispatch(&cli.command)
}
