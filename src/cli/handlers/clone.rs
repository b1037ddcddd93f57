// src/cli/handlers/clone.rs

use crate::{
    cli::args::CloneArgs,
    core::command::{Command, CommandContext, ParsedArgs},
    models::CloneOverrides,
};
use anyhow::{Context, Result};
use clap::CommandFactory;
use colored::Colorize;

/// Copies an existing environment under a new name.
#[derive(Debug)]
pub struct CloneEnv;

pub fn command() -> Box<dyn Command> {
    Box::new(CloneEnv)
}

impl Command for CloneEnv {
    fn name(&self) -> &'static str {
        "clone"
    }

    fn help(&self) -> &'static str {
        "Clones an existing environment, optionally overriding runtime, heap or artifact."
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(CloneArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let clone_args: CloneArgs = args.get()?;
        let old = clone_args.old.trim();
        let new = clone_args.new.trim();
        let overrides = CloneOverrides {
            runtime: clone_args.runtime,
            heap: clone_args.heap,
            artifact: clone_args.artifact.map(|a| a.trim().to_string()),
        };

        ctx.store()
            .clone_env(old, new, &overrides)
            .with_context(|| format!("Failed to clone environment '{}' to '{}'", old, new))?;
        ctx.println(&format!(
            "{} Environment '{}' cloned to '{}'.",
            "✔".green(),
            old.cyan(),
            new.cyan()
        ));
        Ok(true)
    }
}
