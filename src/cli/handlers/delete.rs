// src/cli/handlers/delete.rs

use crate::{
    cli::args::DeleteArgs,
    core::{
        command::{Command, CommandContext, ParsedArgs},
        store::DeleteOutcome,
    },
};
use anyhow::{Context, Result};
use clap::CommandFactory;
use colored::Colorize;

/// Removes an environment together with its directory.
#[derive(Debug)]
pub struct Delete;

pub fn command() -> Box<dyn Command> {
    Box::new(Delete)
}

impl Command for Delete {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn help(&self) -> &'static str {
        "Deletes an environment."
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(DeleteArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let delete_args: DeleteArgs = args.get()?;
        let name = delete_args.name.trim();

        let outcome = ctx
            .store()
            .delete(name)
            .with_context(|| format!("Failed to delete environment '{}'", name))?;
        match outcome {
            DeleteOutcome::Removed => ctx.println(&format!(
                "{} Environment '{}' deleted.",
                "✔".green(),
                name.cyan()
            )),
            DeleteOutcome::Absent => ctx.println(&format!(
                "Environment '{}' does not exist; nothing to delete.",
                name
            )),
        }
        Ok(true)
    }
}
