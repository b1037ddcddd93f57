// src/cli/handlers/run.rs

use crate::{
    cli::handlers::launch,
    core::command::{Command, CommandContext, ParsedArgs},
};
use anyhow::{Result, bail};

/// Runs an arbitrary entry point (e.g. a classifier) in the environment.
///
/// Takes no options of its own: the first argument is the entry point and
/// everything after it, help flags included, goes to the launched class.
#[derive(Debug)]
pub struct Run;

pub fn command() -> Box<dyn Command> {
    Box::new(Run)
}

impl Command for Run {
    fn name(&self) -> &'static str {
        "run"
    }

    fn help(&self) -> &'static str {
        "Runs a class in the environment: the first argument is the class, the rest are passed on to it."
    }

    fn requires_environment(&self) -> bool {
        true
    }

    fn supports_additional_arguments(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let Some((entry_point, options)) = args.additional.split_first() else {
            bail!("'run' needs the class to run, e.g. 'run <env> weka.classifiers.trees.J48 -t data.arff'.");
        };
        launch::run_entry_point(ctx, entry_point, options)
    }
}
