//! # Scripts
//!
//! A script is a text file with one command invocation per line, tokenized
//! with shell quoting rules. Blank lines and lines starting with `#` are
//! ignored. Before a step runs, every `${name}` in its arguments is replaced
//! by the current value of the script variable `name`.
//!
//! The engine runs the steps strictly in order against one shared variable
//! store and stops at the first failing step. Effects of earlier steps are
//! kept.

use crate::{
    cli::dispatcher::{DispatchError, Dispatcher},
    core::variables::{VariableError, VariableStore},
    system::output::SharedSink,
};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script '{path}'.")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Line {line}: unbalanced quotes or trailing escape.")]
    Parse { line: usize },
    #[error("Line {line}: unknown command '{command}'.")]
    UnknownCommand { line: usize, command: String },
    #[error("Line {line}: command '{command}' cannot be used inside scripts.")]
    NotScriptCapable { line: usize, command: String },
    #[error("Line {line}: variable substitution failed.")]
    Variable {
        line: usize,
        source: VariableError,
    },
    #[error("Line {line}: command '{command}' failed.")]
    StepFailed { line: usize, command: String },
    #[error("Line {line}: command '{command}' could not be run.")]
    Step {
        line: usize,
        command: String,
        source: DispatchError,
    },
    #[error("The script engine has already finished; create a new one to run again.")]
    AlreadyFinished,
}

/// One command invocation, as written in the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    /// 1-based line number in the source.
    pub line: usize,
    pub command: String,
    /// Raw argument tokens; variables are substituted at execution time.
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut tokens = shlex::split(trimmed).ok_or(ScriptError::Parse { line })?;
            if tokens.is_empty() {
                continue;
            }
            let command = tokens.remove(0);
            steps.push(ScriptStep {
                line,
                command,
                args: tokens,
            });
        }
        Ok(Self { steps })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    Idle,
    /// Executing the step at this line.
    Running { line: usize },
    Completed,
    /// Stopped at the step at this line.
    Failed { line: usize },
}

impl ScriptState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

/// Sequential interpreter for one script run.
#[derive(Debug)]
pub struct ScriptEngine {
    state: ScriptState,
    variables: VariableStore,
}

impl ScriptEngine {
    pub fn new(variables: VariableStore) -> Self {
        Self {
            state: ScriptState::Idle,
            variables,
        }
    }

    pub fn state(&self) -> ScriptState {
        self.state
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Runs every step of `script` through `dispatcher`.
    ///
    /// An engine runs once; a second call fails with [`ScriptError::AlreadyFinished`].
    pub fn run(
        &mut self,
        script: &Script,
        dispatcher: &Dispatcher,
        sink: &SharedSink,
    ) -> Result<(), ScriptError> {
        if self.state != ScriptState::Idle {
            return Err(ScriptError::AlreadyFinished);
        }

        for step in &script.steps {
            self.state = ScriptState::Running { line: step.line };
            if let Err(e) = self.run_step(step, dispatcher, sink) {
                self.state = ScriptState::Failed { line: step.line };
                log::debug!("Script stopped at line {}: {}", step.line, e);
                return Err(e);
            }
        }
        self.state = ScriptState::Completed;
        Ok(())
    }

    fn run_step(
        &mut self,
        step: &ScriptStep,
        dispatcher: &Dispatcher,
        sink: &SharedSink,
    ) -> Result<(), ScriptError> {
        let command = dispatcher.registry().find(&step.command).ok_or_else(|| {
            ScriptError::UnknownCommand {
                line: step.line,
                command: step.command.clone(),
            }
        })?;
        if !command.scope().script_capable() {
            return Err(ScriptError::NotScriptCapable {
                line: step.line,
                command: step.command.clone(),
            });
        }

        let args = self
            .variables
            .expand_all(&step.args)
            .map_err(|source| ScriptError::Variable {
                line: step.line,
                source,
            })?;
        log::debug!("Line {}: {} {:?}", step.line, step.command, args);

        match dispatcher.invoke(command, args, sink, Some(&mut self.variables)) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ScriptError::StepFailed {
                line: step.line,
                command: step.command.clone(),
            }),
            Err(source) => Err(ScriptError::Step {
                line: step.line,
                command: step.command.clone(),
                source,
            }),
        }
    }
}
