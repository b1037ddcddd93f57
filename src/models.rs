// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named, persisted profile pinning a runtime, a heap size, a toolkit
/// artifact and a set of environment variables.
///
/// Identity is the `name` alone; two descriptors with the same name refer to
/// the same environment regardless of their other fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvironmentDescriptor {
    /// Unique key; also the directory name under the environments root.
    pub name: String,
    /// Runtime executable. Empty means the configured default.
    #[serde(default)]
    pub runtime: String,
    /// Heap size (e.g. `2g`). Empty means the runtime's default.
    #[serde(default)]
    pub heap: String,
    /// The toolkit jar. Never empty.
    pub artifact: String,
    /// Variables overlaid onto the child environment at launch.
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
}

impl EnvironmentDescriptor {
    /// A descriptor with default runtime and heap and no variables.
    pub fn new(name: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact: artifact.into(),
            ..Self::default()
        }
    }
}

/// Field overrides applied when cloning an environment.
/// `None` copies the source value; `Some("")` resets runtime/heap to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOverrides {
    /// Runtime executable of the clone.
    pub runtime: Option<String>,
    /// Heap size of the clone.
    pub heap: Option<String>,
    /// Toolkit jar of the clone.
    pub artifact: Option<String>,
}

/// In-place edits applied by the `update` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorChanges {
    /// New runtime executable; empty resets to the default.
    pub runtime: Option<String>,
    /// New heap size; empty resets to the runtime default.
    pub heap: Option<String>,
    /// New toolkit jar.
    pub artifact: Option<String>,
    /// Variables to add or overwrite.
    pub set_env: BTreeMap<String, String>,
    /// Variables to remove.
    pub unset_env: Vec<String>,
}

impl DescriptorChanges {
    /// Whether applying these changes would leave the descriptor as is.
    pub fn is_empty(&self) -> bool {
        self.runtime.is_none()
            && self.heap.is_none()
            && self.artifact.is_none()
            && self.set_env.is_empty()
            && self.unset_env.is_empty()
    }
}

/// The stream a line of output originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamOrigin {
    /// The child's standard output.
    Stdout,
    /// The child's standard error.
    Stderr,
}

impl fmt::Display for StreamOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

/// Where a command may be invoked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandScope {
    /// Top level only.
    General,
    /// Top level and inside scripts.
    Both,
    /// Inside scripts only; needs a variable store.
    ScriptOnly,
}

impl CommandScope {
    /// Whether the command may run inside scripts.
    pub fn script_capable(self) -> bool {
        matches!(self, Self::Both | Self::ScriptOnly)
    }

    /// Whether the command may run from the command line.
    pub fn top_level(self) -> bool {
        matches!(self, Self::General | Self::Both)
    }
}
