// src/cli/handlers/script.rs

use crate::{
    cli::{args::ScriptArgs, handlers::commons},
    constants::{SCRIPT_DIR_VAR, SCRIPT_FILE_VAR},
    core::{
        command::{Command, CommandContext, ParsedArgs},
        paths,
        script::{Script, ScriptEngine},
        variables::VariableStore,
    },
    models::CommandScope,
};
use anyhow::{Context, Result};
use clap::CommandFactory;
use std::fs;

/// Runs a script file through the script engine.
#[derive(Debug)]
pub struct RunScript;

pub fn command() -> Box<dyn Command> {
    Box::new(RunScript)
}

impl Command for RunScript {
    fn name(&self) -> &'static str {
        "script"
    }

    fn help(&self) -> &'static str {
        "Executes the commands listed in a script file, stopping at the first failure."
    }

    fn scope(&self) -> CommandScope {
        CommandScope::General
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(ScriptArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let script_args: ScriptArgs = args.get()?;
        let path = paths::expand_user_path(&script_args.file)?;
        let script = Script::load(&path)?;

        let absolute = paths::simplified(
            &fs::canonicalize(&path)
                .with_context(|| format!("Failed to resolve '{}'", path.display()))?,
        );
        let mut variables = VariableStore::new();
        variables.set(SCRIPT_FILE_VAR, absolute.display().to_string())?;
        if let Some(parent) = absolute.parent() {
            variables.set(SCRIPT_DIR_VAR, parent.display().to_string())?;
        }
        for (name, value) in commons::parse_env_assignments(&script_args.vars)? {
            variables.set(&name, value)?;
        }

        log::info!(
            "Running script '{}' ({} steps)",
            absolute.display(),
            script.len()
        );
        let mut engine = ScriptEngine::new(variables);
        engine
            .run(&script, ctx.dispatcher, &ctx.sink)
            .with_context(|| format!("Script '{}' failed", absolute.display()))?;
        Ok(true)
    }
}
