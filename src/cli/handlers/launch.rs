// src/cli/handlers/launch.rs

use crate::{
    core::command::{Command, CommandContext, ParsedArgs},
    system::launcher,
};
use anyhow::{Context, Result};

/// A toolkit sub-application started by a dedicated verb.
#[derive(Debug)]
pub struct LaunchTarget {
    pub name: &'static str,
    pub entry_point: &'static str,
    pub help: &'static str,
}

pub static EXPLORER: LaunchTarget = LaunchTarget {
    name: "explorer",
    entry_point: "weka.gui.explorer.Explorer",
    help: "Launches the Explorer in the environment.",
};

pub static EXPERIMENTER: LaunchTarget = LaunchTarget {
    name: "experimenter",
    entry_point: "weka.gui.experiment.Experimenter",
    help: "Launches the Experimenter in the environment.",
};

pub static GUI_CHOOSER: LaunchTarget = LaunchTarget {
    name: "gui_chooser",
    entry_point: "weka.gui.GUIChooser",
    help: "Launches the GUIChooser in the environment.",
};

pub static KNOWLEDGE_FLOW: LaunchTarget = LaunchTarget {
    name: "knowledge_flow",
    entry_point: "weka.gui.knowledgeflow.KnowledgeFlow",
    help: "Launches the KnowledgeFlow in the environment.",
};

pub static PACKAGE_MANAGER: LaunchTarget = LaunchTarget {
    name: "package_manager",
    entry_point: "weka.core.WekaPackageManager",
    help: "Runs the package manager in the environment; arguments are passed through.",
};

pub static SIMPLE_CLI: LaunchTarget = LaunchTarget {
    name: "simple_cli",
    entry_point: "weka.gui.SimpleCLI",
    help: "Launches the SimpleCLI in the environment.",
};

pub static WORKBENCH: LaunchTarget = LaunchTarget {
    name: "workbench",
    entry_point: "weka.gui.Workbench",
    help: "Launches the Workbench in the environment.",
};

/// Runs the target's entry point in the environment and waits for it to exit.
/// Every argument after the environment name is handed to the application.
#[derive(Debug)]
pub struct LaunchCommand {
    target: &'static LaunchTarget,
}

impl LaunchCommand {
    pub fn new(target: &'static LaunchTarget) -> Self {
        Self { target }
    }
}

pub fn explorer() -> Box<dyn Command> {
    Box::new(LaunchCommand::new(&EXPLORER))
}

pub fn experimenter() -> Box<dyn Command> {
    Box::new(LaunchCommand::new(&EXPERIMENTER))
}

pub fn gui_chooser() -> Box<dyn Command> {
    Box::new(LaunchCommand::new(&GUI_CHOOSER))
}

pub fn knowledge_flow() -> Box<dyn Command> {
    Box::new(LaunchCommand::new(&KNOWLEDGE_FLOW))
}

pub fn package_manager() -> Box<dyn Command> {
    Box::new(LaunchCommand::new(&PACKAGE_MANAGER))
}

pub fn simple_cli() -> Box<dyn Command> {
    Box::new(LaunchCommand::new(&SIMPLE_CLI))
}

pub fn workbench() -> Box<dyn Command> {
    Box::new(LaunchCommand::new(&WORKBENCH))
}

impl Command for LaunchCommand {
    fn name(&self) -> &'static str {
        self.target.name
    }

    fn help(&self) -> &'static str {
        self.target.help
    }

    fn requires_environment(&self) -> bool {
        true
    }

    fn supports_additional_arguments(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, args: ParsedArgs) -> Result<bool> {
        run_entry_point(ctx, self.target.entry_point, &args.additional)
    }
}

/// Builds and runs `entry_point` inside the context's environment, blocking until it exits.
pub fn run_entry_point(
    ctx: &CommandContext<'_>,
    entry_point: &str,
    options: &[String],
) -> Result<bool> {
    let descriptor = ctx.environment()?;
    let env_dir = ctx.store().env_dir(&descriptor.name);
    let invocation = launcher::build(entry_point, options, descriptor, &env_dir, ctx.settings())
        .with_context(|| format!("Failed to prepare '{}'", entry_point))?;

    log::info!(
        "Launching in environment '{}': {}",
        descriptor.name,
        invocation.command_line()
    );
    let success = launcher::launch(&invocation, &ctx.sink)
        .with_context(|| format!("Failed to launch '{}'", entry_point))?;
    Ok(success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_have_distinct_names() {
        let targets = [
            &EXPLORER,
            &EXPERIMENTER,
            &GUI_CHOOSER,
            &KNOWLEDGE_FLOW,
            &PACKAGE_MANAGER,
            &SIMPLE_CLI,
            &WORKBENCH,
        ];
        let mut names: Vec<_> = targets.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), targets.len());
        assert!(targets.iter().all(|t| t.entry_point.starts_with("weka.")));
    }

    #[test]
    fn test_launch_command_passes_arguments_through() {
        let command = explorer();
        assert_eq!(command.name(), "explorer");
        assert!(command.requires_environment());
        assert!(command.supports_additional_arguments());
        assert!(command.parser().is_none());
    }
}
