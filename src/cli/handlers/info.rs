// src/cli/handlers/info.rs

use crate::{
    cli::{args::InfoArgs, handlers::commons},
    core::command::{Command, CommandContext, ParsedArgs},
};
use anyhow::{Context, Result};
use clap::CommandFactory;

/// Displays the descriptor of one environment.
#[derive(Debug)]
pub struct Info;

pub fn command() -> Box<dyn Command> {
    Box::new(Info)
}

impl Command for Info {
    fn name(&self) -> &'static str {
        "info"
    }

    fn help(&self) -> &'static str {
        "Displays the settings of an environment."
    }

    fn requires_environment(&self) -> bool {
        true
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(InfoArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let info_args: InfoArgs = args.get()?;
        let descriptor = ctx.environment()?;

        if info_args.json {
            let json = serde_json::to_string_pretty(descriptor)
                .context("Failed to serialize environment")?;
            for line in json.lines() {
                ctx.println(line);
            }
        } else {
            commons::print_descriptor(
                &ctx.sink,
                ctx.store(),
                descriptor,
                &ctx.settings().default_runtime,
            );
        }
        Ok(true)
    }
}
