// CLI module
// Command-line interface, argument parsing, and command execution

mod args;
mod commands;

pub use args::{CliArgs, Command};
pub use commands::execute;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing subcommand, or `--help`),
/// clap displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
