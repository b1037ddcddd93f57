// src/cli/handlers/list.rs

use crate::{
    cli::{args::ListArgs, handlers::commons},
    core::command::{Command, CommandContext, ParsedArgs},
    models::EnvironmentDescriptor,
};
use anyhow::{Context, Result};
use clap::CommandFactory;
use colored::Colorize;

/// Lists the environments in the store.
#[derive(Debug)]
pub struct List;

pub fn command() -> Box<dyn Command> {
    Box::new(List)
}

impl Command for List {
    fn name(&self) -> &'static str {
        "list"
    }

    fn help(&self) -> &'static str {
        "Lists all environments."
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(ListArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let list_args: ListArgs = args.get()?;
        let store = ctx.store();
        let names = store.list().context("Failed to list environments")?;

        if !list_args.long && !list_args.json {
            for name in &names {
                ctx.println(name);
            }
            return Ok(true);
        }

        // Unreadable descriptors are skipped with a warning rather than failing the listing.
        let mut descriptors: Vec<EnvironmentDescriptor> = Vec::with_capacity(names.len());
        for name in &names {
            match store.load(name) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(e) => log::warn!("Skipping environment '{}': {}", name, e),
            }
        }

        if list_args.json {
            let json = serde_json::to_string_pretty(&descriptors)
                .context("Failed to serialize environments")?;
            for line in json.lines() {
                ctx.println(line);
            }
            return Ok(true);
        }

        if descriptors.is_empty() {
            ctx.println(&"No environments found.".dimmed().to_string());
            return Ok(true);
        }
        let default_runtime = ctx.settings().default_runtime.as_str();
        for descriptor in &descriptors {
            ctx.println(&format!(
                "{:<20} {:<24} {:<8} {}",
                descriptor.name.cyan(),
                commons::or_default(&descriptor.runtime, default_runtime),
                commons::or_default(&descriptor.heap, "-"),
                descriptor.artifact
            ));
        }
        Ok(true)
    }
}
