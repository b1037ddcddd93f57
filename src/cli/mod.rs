// src/cli/mod.rs

use clap::Parser;

pub mod args;
pub mod dispatcher;
pub mod handlers;
pub mod registry;

/// wekaenv: isolated, named Weka environments.
///
/// Usage: `wekaenv <command> [<env>] [options...] [-- passthrough-args]`.
/// Run `wekaenv list_cmds` for the available commands and
/// `wekaenv <command> --help` for the options of one command.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The command followed by its arguments; everything is handed to the dispatcher.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
