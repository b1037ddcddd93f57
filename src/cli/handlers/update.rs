// src/cli/handlers/update.rs

use crate::{
    cli::{args::UpdateArgs, handlers::commons},
    core::command::{Command, CommandContext, ParsedArgs},
    models::DescriptorChanges,
};
use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use colored::Colorize;

/// Edits the descriptor of an existing environment in place.
#[derive(Debug)]
pub struct Update;

pub fn command() -> Box<dyn Command> {
    Box::new(Update)
}

impl Command for Update {
    fn name(&self) -> &'static str {
        "update"
    }

    fn help(&self) -> &'static str {
        "Updates runtime, heap, artifact or environment variables of an environment."
    }

    fn requires_environment(&self) -> bool {
        true
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(UpdateArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let update_args: UpdateArgs = args.get()?;
        let name = ctx.environment()?.name.clone();
        let changes = DescriptorChanges {
            runtime: update_args.runtime,
            heap: update_args.heap,
            artifact: update_args.artifact.map(|a| a.trim().to_string()),
            set_env: commons::parse_env_assignments(&update_args.env)?,
            unset_env: update_args.unset_env,
        };
        if changes.is_empty() {
            bail!("Nothing to update for environment '{}'; see 'update --help'.", name);
        }

        let updated = ctx
            .store()
            .update(&name, &changes)
            .with_context(|| format!("Failed to update environment '{}'", name))?;
        ctx.println(&format!("{} Environment '{}' updated.", "✔".green(), name.cyan()));
        commons::print_descriptor(
            &ctx.sink,
            ctx.store(),
            &updated,
            &ctx.settings().default_runtime,
        );
        Ok(true)
    }
}
