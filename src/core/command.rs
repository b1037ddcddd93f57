//! # Commands
//!
//! A command is a named, self-describing unit of work. It declares whether it
//! needs an environment, which options it accepts (as a `clap` schema), whether
//! unconsumed arguments are passed through to a child process, and where it
//! may be used (top level, scripts or both). The dispatcher does the rest:
//! environment hydration, option parsing, help screens and error reporting.

use crate::{
    cli::dispatcher::Dispatcher,
    core::{settings::Settings, store::EnvironmentStore, variables::VariableStore},
    models::{CommandScope, EnvironmentDescriptor},
    system::output::SharedSink,
};
use anyhow::{Result, anyhow};
use clap::{ArgMatches, FromArgMatches};
use std::cmp::Ordering;
use std::fmt::{self, Write};

/// Everything one command invocation may touch.
pub struct CommandContext<'a> {
    pub dispatcher: &'a Dispatcher,
    pub sink: SharedSink,
    /// Snapshot of the environment named on the command line, if the command requires one.
    pub environment: Option<EnvironmentDescriptor>,
    /// The script's variables; `None` outside scripts.
    pub variables: Option<&'a mut VariableStore>,
}

impl fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("environment", &self.environment)
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}

impl<'a> CommandContext<'a> {
    pub fn store(&self) -> &'a EnvironmentStore {
        self.dispatcher.store()
    }

    pub fn settings(&self) -> &'a Settings {
        self.dispatcher.settings()
    }

    pub fn environment(&self) -> Result<&EnvironmentDescriptor> {
        self.environment
            .as_ref()
            .ok_or_else(|| anyhow!("No environment loaded."))
    }

    pub fn variables(&mut self) -> Result<&mut VariableStore> {
        self.variables
            .as_deref_mut()
            .ok_or_else(|| anyhow!("No script context set."))
    }

    pub fn println(&self, line: &str) {
        self.sink.println(line);
    }
}

/// Arguments left after the environment name has been consumed.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub matches: Option<ArgMatches>,
    /// Unconsumed arguments to hand to a child process.
    pub additional: Vec<String>,
}

impl ParsedArgs {
    /// Converts the parsed matches into the command's typed options.
    pub fn get<T: FromArgMatches>(&self) -> Result<T> {
        let matches = self
            .matches
            .as_ref()
            .ok_or_else(|| anyhow!("Command declares no options."))?;
        Ok(T::from_arg_matches(matches)?)
    }
}

/// A unit of work reachable from the command line or from scripts.
pub trait Command: Send + Sync + fmt::Debug {
    /// The name used on the command line; unique across the registry.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn help(&self) -> &'static str;

    fn scope(&self) -> CommandScope {
        CommandScope::Both
    }

    /// Whether the first argument names the environment to operate on.
    fn requires_environment(&self) -> bool {
        false
    }

    /// Whether unconsumed arguments are passed on to the launched process.
    /// Only commands without an option schema receive them.
    fn supports_additional_arguments(&self) -> bool {
        false
    }

    /// The option schema, if the command takes options.
    fn parser(&self) -> Option<clap::Command> {
        None
    }

    /// Runs the command. `Ok(false)` means a failure that was already reported.
    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool>;
}

impl PartialEq for dyn Command + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for dyn Command + '_ {}

impl PartialOrd for dyn Command + '_ {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for dyn Command + '_ {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

/// Renders the help screen of a command.
///
/// The first line is the usage summary (`name [<env>] [<options>] [<args>]`),
/// followed by the indented description. With `with_options`, clap's option
/// help is appended.
pub fn help_screen(command: &dyn Command, with_options: bool) -> String {
    let parser = command.parser();
    let mut screen = String::from(command.name());
    if command.requires_environment() {
        screen.push_str(" <env>");
    }
    if parser.is_some() {
        screen.push_str(" [<options>]");
    }
    if command.supports_additional_arguments() {
        screen.push_str(" [<args>]");
    }
    if command.scope() == CommandScope::ScriptOnly {
        screen.push_str("    (scripts only)");
    }
    let _ = write!(screen, "\n\t{}", command.help());

    if with_options {
        if let Some(mut parser) = parser {
            let rendered = parser.render_long_help().to_string();
            if !rendered.trim().is_empty() {
                screen.push_str("\n\n");
                screen.push_str(rendered.trim_end());
            }
        }
    }
    screen
}
