// src/cli/handlers/script_ops/base_name.rs

use crate::{
    cli::args::BaseNameArgs,
    core::command::{Command, CommandContext, ParsedArgs},
    models::CommandScope,
};
use anyhow::{Result, anyhow};
use clap::CommandFactory;
use std::path::Path;

/// Stores the file name part of a path in a variable.
#[derive(Debug)]
pub struct BaseName;

pub fn command() -> Box<dyn Command> {
    Box::new(BaseName)
}

/// `/data/iris.arff` -> `iris.arff`.
pub fn base_name(file: &str) -> Option<String> {
    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

impl Command for BaseName {
    fn name(&self) -> &'static str {
        "base_name"
    }

    fn help(&self) -> &'static str {
        "Extracts the file name (no directories) from a path and stores it in a variable."
    }

    fn scope(&self) -> CommandScope {
        CommandScope::ScriptOnly
    }

    fn parser(&self) -> Option<clap::Command> {
        Some(BaseNameArgs::command())
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        let base_args: BaseNameArgs = args.get()?;
        let name = base_name(&base_args.file)
            .ok_or_else(|| anyhow!("'{}' has no file name.", base_args.file))?;
        ctx.variables()?.set(&base_args.dest, name)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/data/iris.arff").as_deref(), Some("iris.arff"));
        assert_eq!(base_name("iris.arff").as_deref(), Some("iris.arff"));
        assert_eq!(base_name("/data/sets/").as_deref(), Some("sets"));
        assert_eq!(base_name("/"), None);
        assert_eq!(base_name("/data/.."), None);
    }
}
