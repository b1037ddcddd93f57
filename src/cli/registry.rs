// src/cli/registry.rs

use crate::{
    cli::handlers::{
        clone, create, delete, info, launch, list, list_cmds, run, script,
        script_ops::{base_name, dir_name, echo, get_env, set_var},
        update,
    },
    core::command::Command,
};

/// Associates a command name with the function that instantiates it.
#[derive(Debug)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub factory: fn() -> Box<dyn Command>,
}

/// The single source of truth for all commands.
/// To add a new command, add an entry here; the order does not matter.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "base_name",
        factory: base_name::command,
    },
    CommandDefinition {
        name: "clone",
        factory: clone::command,
    },
    CommandDefinition {
        name: "create",
        factory: create::command,
    },
    CommandDefinition {
        name: "delete",
        factory: delete::command,
    },
    CommandDefinition {
        name: "dir_name",
        factory: dir_name::command,
    },
    CommandDefinition {
        name: "echo",
        factory: echo::command,
    },
    CommandDefinition {
        name: "experimenter",
        factory: launch::experimenter,
    },
    CommandDefinition {
        name: "explorer",
        factory: launch::explorer,
    },
    CommandDefinition {
        name: "get_env",
        factory: get_env::command,
    },
    CommandDefinition {
        name: "gui_chooser",
        factory: launch::gui_chooser,
    },
    CommandDefinition {
        name: "info",
        factory: info::command,
    },
    CommandDefinition {
        name: "knowledge_flow",
        factory: launch::knowledge_flow,
    },
    CommandDefinition {
        name: "list",
        factory: list::command,
    },
    CommandDefinition {
        name: "list_cmds",
        factory: list_cmds::command,
    },
    CommandDefinition {
        name: "package_manager",
        factory: launch::package_manager,
    },
    CommandDefinition {
        name: "run",
        factory: run::command,
    },
    CommandDefinition {
        name: "script",
        factory: script::command,
    },
    CommandDefinition {
        name: "set_var",
        factory: set_var::command,
    },
    CommandDefinition {
        name: "simple_cli",
        factory: launch::simple_cli,
    },
    CommandDefinition {
        name: "update",
        factory: update::command,
    },
    CommandDefinition {
        name: "workbench",
        factory: launch::workbench,
    },
];

/// All available commands, instantiated once and ordered by name.
#[derive(Debug)]
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
}

impl Registry {
    /// The registry of every built-in command.
    pub fn standard() -> Self {
        Self::from_definitions(COMMAND_REGISTRY)
    }

    pub fn from_definitions(definitions: &[CommandDefinition]) -> Self {
        Self::from_commands(definitions.iter().filter_map(|def| {
            let command = (def.factory)();
            if command.name() != def.name {
                log::warn!(
                    "Registry entry '{}' produced command '{}'; ignoring it.",
                    def.name,
                    command.name()
                );
                return None;
            }
            Some(command)
        }))
    }

    /// Builds a registry from ready-made commands. The first command wins on duplicate names.
    pub fn from_commands(commands: impl IntoIterator<Item = Box<dyn Command>>) -> Self {
        let mut unique: Vec<Box<dyn Command>> = Vec::new();
        for command in commands {
            if unique.iter().any(|c| c.name() == command.name()) {
                log::warn!("Duplicate command '{}' ignored.", command.name());
                continue;
            }
            unique.push(command);
        }
        unique.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        Self { commands: unique }
    }

    /// Finds a command by its exact name.
    pub fn find(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|cmd| cmd.name() == name)
            .map(Box::as_ref)
    }

    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(Box::as_ref)
    }

    /// Commands usable inside scripts.
    pub fn script_commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands().filter(|cmd| cmd.scope().script_capable())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands().map(|cmd| cmd.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::{CommandContext, ParsedArgs};
    use anyhow::Result;

    #[derive(Debug)]
    struct Named(&'static str);

    impl Command for Named {
        fn name(&self) -> &'static str {
            self.0
        }
        fn help(&self) -> &'static str {
            "test command"
        }
        fn execute(&self, _ctx: &mut CommandContext<'_>, _args: ParsedArgs) -> Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_standard_registry_is_sorted_and_unique() {
        let registry = Registry::standard();
        let names = registry.names();

        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), COMMAND_REGISTRY.len());
    }

    #[test]
    fn test_standard_registry_contains_core_verbs() {
        let registry = Registry::standard();
        for name in ["list_cmds", "create", "clone", "delete", "list", "script", "base_name"] {
            assert!(registry.find(name).is_some(), "missing '{name}'");
        }
        assert!(registry.find("nonexistent").is_none());
    }

    #[test]
    fn test_script_commands_exclude_general_ones() {
        let registry = Registry::standard();
        let names: Vec<_> = registry.script_commands().map(|c| c.name()).collect();
        assert!(names.contains(&"base_name"));
        assert!(names.contains(&"create"));
        assert!(!names.contains(&"script"));
        assert!(!names.contains(&"list_cmds"));
    }

    #[test]
    fn test_duplicates_are_dropped_first_wins() {
        let registry = Registry::from_commands(vec![
            Box::new(Named("b")) as Box<dyn Command>,
            Box::new(Named("a")),
            Box::new(Named("b")),
        ]);
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
