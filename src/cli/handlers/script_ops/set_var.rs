// src/cli/handlers/script_ops/set_var.rs

use crate::{
    cli::args::SetVarArgs,
    core::command::{Command, CommandContext, ParsedArgs},
    models::CommandScope,
};
use anyhow::Result;
use clap::CommandFactory;

#[derive(Debug)]
pub struct SetVar;

pub fn command() -> Box<dyn Command> {
    Box::new(SetVar)
}

impl Command for SetVar {
    fn name(&self) -> &'static str {
        "set_var"
    }

    fn help(&self) -> &'static str {
        "Sets a script variable."
    }

    fn scope(&self) -> CommandScope {
        CommandScope::ScriptOnly
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(SetVarArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let set_args: SetVarArgs = args.get()?;
        ctx.variables()?.set(&set_args.name, set_args.value)?;
        Ok(true)
    }
}
