// src/cli/handlers/script_ops/echo.rs

use crate::{
    core::command::{Command, CommandContext, ParsedArgs},
    models::CommandScope,
};
use anyhow::Result;

/// Prints its (substituted) arguments.
#[derive(Debug)]
pub struct Echo;

pub fn command() -> Box<dyn Command> {
    Box::new(Echo)
}

impl Command for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn help(&self) -> &'static str {
        "Prints the given words, separated by single spaces."
    }

    fn scope(&self) -> CommandScope {
        CommandScope::ScriptOnly
    }

    fn supports_additional_arguments(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        ctx.println(&args.additional.join(" "));
        Ok(true)
    }
}
