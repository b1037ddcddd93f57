// src/cli/handlers/script_ops/get_env.rs

use crate::{
    cli::args::GetEnvArgs,
    core::command::{Command, CommandContext, ParsedArgs},
    models::CommandScope,
};
use anyhow::{Result, bail};
use clap::CommandFactory;
use std::env::{self, VarError};

/// Copies a process environment variable into a script variable.
#[derive(Debug)]
pub struct GetEnv;

pub fn command() -> Box<dyn Command> {
    Box::new(GetEnv)
}

impl Command for GetEnv {
    fn name(&self) -> &'static str {
        "get_env"
    }

    fn help(&self) -> &'static str {
        "Stores the value of a process environment variable in a script variable."
    }

    fn scope(&self) -> CommandScope {
        CommandScope::ScriptOnly
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(GetEnvArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let env_args: GetEnvArgs = args.get()?;
        let value = match env::var(&env_args.name) {
            Ok(value) => value,
            Err(VarError::NotPresent) => match env_args.default {
                Some(default) => default,
                None => bail!(
                    "Environment variable '{}' is not set and no default was given.",
                    env_args.name
                ),
            },
            Err(VarError::NotUnicode(_)) => {
                bail!("Environment variable '{}' is not valid unicode.", env_args.name)
            }
        };
        ctx.variables()?.set(&env_args.dest, value)?;
        Ok(true)
    }
}
