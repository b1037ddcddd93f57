// src/cli/dispatcher.rs

use crate::{
    cli::registry::Registry,
    core::{
        command::{Command, CommandContext, ParsedArgs, help_screen},
        paths,
        settings::{self, Settings},
        store::{EnvironmentStore, StoreError},
        variables::VariableStore,
    },
    system::output::SharedSink,
};
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use std::sync::Arc;
use thiserror::Error;

/// Why a command could not be run (or failed while running).
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No command specified. Available commands: {available}")]
    NoCommand { available: String },
    #[error("Unknown command '{name}'. Available commands: {available}")]
    UnknownCommand { name: String, available: String },
    #[error("Command '{name}' can only be used inside scripts.")]
    ScriptOnly { name: String },
    #[error("Command '{command}' requires an environment name as first argument.")]
    MissingEnvironment { command: String },
    #[error("{0}")]
    Environment(#[from] StoreError),
    #[error("Invalid arguments for '{command}':\n{message}")]
    Usage { command: String, message: String },
    #[error("Command '{command}' does not accept additional arguments: {arguments}")]
    UnexpectedArguments { command: String, arguments: String },
    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

/// Routes a verb to its command and drives the invocation.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
    store: EnvironmentStore,
    settings: Settings,
}

impl Dispatcher {
    pub fn new(registry: Registry, store: EnvironmentStore, settings: Settings) -> Self {
        Self {
            registry,
            store,
            settings,
        }
    }

    /// Builds a dispatcher from the user's config directory and `settings.toml`.
    pub fn from_config() -> Result<Self> {
        let config_dir = paths::get_config_dir().context("Failed to locate config directory")?;
        let settings = settings::load_settings().context("Failed to load settings")?;
        let root = settings.environments_root(&config_dir)?;
        let store = EnvironmentStore::open(&root).with_context(|| {
            format!("Failed to open environments directory '{}'", root.display())
        })?;
        Ok(Self::new(Registry::standard(), store, settings))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &EnvironmentStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs `argv` (verb first) and reports any failure through the sink.
    /// Returns whether the command succeeded; never panics or propagates errors.
    pub fn dispatch(&self, argv: &[String], sink: &SharedSink) -> bool {
        match self.try_dispatch(argv, sink) {
            Ok(success) => success,
            Err(DispatchError::Execution(e)) => {
                sink.error(&e.to_string(), Some(&e));
                false
            }
            Err(e) => {
                sink.error(&e.to_string(), None);
                false
            }
        }
    }

    /// Like [`Dispatcher::dispatch`] but hands the typed error back to the caller.
    pub fn try_dispatch(&self, argv: &[String], sink: &SharedSink) -> Result<bool, DispatchError> {
        log::debug!("Dispatching args: {:?}", argv);

        let Some((verb, rest)) = argv.split_first() else {
            return Err(DispatchError::NoCommand {
                available: self.available_names(),
            });
        };
        let command = self
            .registry
            .find(verb)
            .ok_or_else(|| DispatchError::UnknownCommand {
                name: verb.clone(),
                available: self.available_names(),
            })?;

        self.invoke(command, rest.to_vec(), sink, None)
    }

    /// Runs one command with its arguments (verb already stripped).
    ///
    /// Shared by top-level dispatch and the script engine; `variables` is the
    /// script's store when called from a script.
    pub fn invoke(
        &self,
        command: &dyn Command,
        mut args: Vec<String>,
        sink: &SharedSink,
        variables: Option<&mut VariableStore>,
    ) -> Result<bool, DispatchError> {
        // Help wins over everything else, so `<cmd> --help` always works.
        if args.first().is_some_and(|a| is_help_flag(a)) {
            self.print_help(command, sink);
            return Ok(true);
        }

        if !command.scope().top_level() && variables.is_none() {
            return Err(DispatchError::ScriptOnly {
                name: command.name().to_string(),
            });
        }

        let environment = if command.requires_environment() {
            if args.first().is_none_or(|a| a.starts_with('-')) {
                return Err(DispatchError::MissingEnvironment {
                    command: command.name().to_string(),
                });
            }
            let name = args.remove(0);
            Some(self.store.load(&name)?)
        } else {
            None
        };

        let Some(parsed) = self.parse_arguments(command, args)? else {
            self.print_help(command, sink);
            return Ok(true);
        };

        log::debug!(
            "Executing '{}' (environment: {:?})",
            command.name(),
            environment.as_ref().map(|e| e.name.as_str())
        );
        let mut ctx = CommandContext {
            dispatcher: self,
            sink: Arc::clone(sink),
            environment,
            variables,
        };
        Ok(command.execute(&mut ctx, parsed)?)
    }

    /// Parses the arguments against the command's schema.
    /// Returns `None` when help was requested.
    fn parse_arguments(
        &self,
        command: &dyn Command,
        args: Vec<String>,
    ) -> Result<Option<ParsedArgs>, DispatchError> {
        let name = command.name().to_string();

        let Some(parser) = command.parser() else {
            let mut tokens = args;
            // Only a leading help flag is ours; later ones belong to the command's arguments.
            match tokens.first().map(String::as_str) {
                Some("--") => {
                    tokens.remove(0);
                }
                Some(first) if is_help_flag(first) => return Ok(None),
                _ => {}
            }
            if !tokens.is_empty() && !command.supports_additional_arguments() {
                return Err(DispatchError::UnexpectedArguments {
                    command: name,
                    arguments: tokens.join(" "),
                });
            }
            return Ok(Some(ParsedArgs {
                matches: None,
                additional: tokens,
            }));
        };

        let matches = parser
            .no_binary_name(true)
            .try_get_matches_from(&args)
            .map_err(|e| match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
                _ => Some(DispatchError::Usage {
                    command: name.clone(),
                    message: e.render().to_string().trim_end().to_string(),
                }),
            });
        match matches {
            Ok(matches) => Ok(Some(ParsedArgs {
                matches: Some(matches),
                additional: Vec::new(),
            })),
            Err(None) => Ok(None),
            Err(Some(e)) => Err(e),
        }
    }

    fn print_help(&self, command: &dyn Command, sink: &SharedSink) {
        for line in help_screen(command, true).lines() {
            sink.println(line);
        }
    }

    fn available_names(&self) -> String {
        self.registry.names().join(", ")
    }
}

fn is_help_flag(arg: &str) -> bool {
    arg == "--help" || arg == "-h"
}
