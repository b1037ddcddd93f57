// src/cli/handlers/create.rs

use crate::{
    cli::{args::CreateArgs, handlers::commons},
    core::command::{Command, CommandContext, ParsedArgs},
    models::EnvironmentDescriptor,
};
use anyhow::{Context, Result};
use clap::CommandFactory;
use colored::Colorize;

/// Creates a new environment.
#[derive(Debug)]
pub struct Create;

pub fn command() -> Box<dyn Command> {
    Box::new(Create)
}

impl Command for Create {
    fn name(&self) -> &'static str {
        "create"
    }

    fn help(&self) -> &'static str {
        "Creates a new environment."
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(CreateArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let create_args: CreateArgs = args.get()?;
        let descriptor = EnvironmentDescriptor {
            name: create_args.name.trim().to_string(),
            runtime: create_args.runtime.trim().to_string(),
            heap: create_args.heap.trim().to_string(),
            artifact: create_args.artifact.trim().to_string(),
            env_vars: commons::parse_env_assignments(&create_args.env)?,
        };

        ctx.store()
            .create(&descriptor)
            .with_context(|| format!("Failed to create environment '{}'", descriptor.name))?;
        ctx.println(&format!(
            "{} Environment '{}' created.",
            "✔".green(),
            descriptor.name.cyan()
        ));
        Ok(true)
    }
}
