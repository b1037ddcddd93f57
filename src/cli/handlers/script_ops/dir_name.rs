// src/cli/handlers/script_ops/dir_name.rs

use crate::{
    cli::args::DirNameArgs,
    core::command::{Command, CommandContext, ParsedArgs},
    models::CommandScope,
};
use anyhow::{Result, anyhow};
use clap::CommandFactory;
use std::path::Path;

/// Stores the directory part of a path in a variable.
#[derive(Debug)]
pub struct DirName;

pub fn command() -> Box<dyn Command> {
    Box::new(DirName)
}

/// `/data/iris.arff` -> `/data`; a bare file name yields `.`.
pub fn dir_name(file: &str) -> Option<String> {
    let parent = Path::new(file).parent()?;
    if parent.as_os_str().is_empty() {
        Some(".".to_string())
    } else {
        Some(parent.to_string_lossy().into_owned())
    }
}

impl Command for DirName {
    fn name(&self) -> &'static str {
        "dir_name"
    }

    fn help(&self) -> &'static str {
        "Extracts the directory from a path and stores it in a variable."
    }

    fn scope(&self) -> CommandScope {
        CommandScope::ScriptOnly
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(DirNameArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let dir_args: DirNameArgs = args.get()?;
        let dir = dir_name(&dir_args.file)
            .ok_or_else(|| anyhow!("'{}' has no parent directory.", dir_args.file))?;
        ctx.variables()?.set(&dir_args.dest, dir)?;
        Ok(true)
    }
}
