// src/cli/handlers/list_cmds.rs

use crate::{
    core::command::{Command, CommandContext, ParsedArgs, help_screen},
    models::CommandScope,
};
use anyhow::Result;

/// Prints the help screen of every registered command.
#[derive(Debug)]
pub struct ListCmds;

pub fn command() -> Box<dyn Command> {
    Box::new(ListCmds)
}

impl Command for ListCmds {
    fn name(&self) -> &'static str {
        "list_cmds"
    }

    fn help(&self) -> &'static str {
        "Lists all available commands."
    }

    fn scope(&self) -> CommandScope {
        CommandScope::General
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, _args: ParsedArgs) -> Result<bool> {
        ctx.println("Available commands:");
        for command in ctx.dispatcher.registry().commands() {
            ctx.println("");
            for line in help_screen(command, false).lines() {
                ctx.println(line);
            }
        }
        ctx.println("");
        ctx.println("Notes:");
        ctx.println("  <env>      the name of the environment to operate on");
        ctx.println("  <options>  command options; use '<command> --help' to see them");
        ctx.println("  <args>     arguments passed on to the launched program, after '--'");
        ctx.println("             when the command also takes options");
        Ok(true)
    }
}
