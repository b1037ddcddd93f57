// src/system/launcher.rs

use crate::{
    core::{
        paths::{self, PathError},
        settings::Settings,
    },
    models::{EnvironmentDescriptor, StreamOrigin},
    system::output::SharedSink,
};
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command as StdCommand, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Runtime '{0}' could not be found.")]
    RuntimeNotFound(String),
    #[error("Toolkit artifact '{0}' does not exist or is not a file.")]
    ArtifactMissing(String),
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    #[error("Command '{0}' could not be executed: {1}")]
    SpawnFailed(String, #[source] std::io::Error),
    #[error("Failed to wait for process {pid}: {source}")]
    Wait {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
}

/// A fully assembled child-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Overlaid onto the inherited environment; later entries win.
    pub env: BTreeMap<String, String>,
    /// Artifact that must exist before spawning, if any.
    pub artifact: Option<PathBuf>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: BTreeMap::new(),
            artifact: None,
        }
    }

    /// The invocation as a shell-quoted command line, for logs and messages.
    pub fn command_line(&self) -> String {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(words).unwrap_or_else(|_| {
            std::iter::once(self.program.clone())
                .chain(self.args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

/// Composes the invocation that runs `entry_point` inside an environment.
///
/// Layout: `<runtime> [<heap_flag><heap>] [<classpath_flag>] <artifact> <entry_point> <options...>`.
/// The environment directory is exported as `settings.home_variable`; the
/// descriptor's own variables are applied on top and win on conflicts.
pub fn build(
    entry_point: &str,
    options: &[String],
    descriptor: &EnvironmentDescriptor,
    env_dir: &Path,
    settings: &Settings,
) -> Result<Invocation, LaunchError> {
    let runtime = if descriptor.runtime.trim().is_empty() {
        settings.default_runtime.clone()
    } else {
        paths::expand_user_path(descriptor.runtime.trim())?
            .display()
            .to_string()
    };
    let artifact = paths::expand_user_path(&descriptor.artifact)?;

    let mut args = Vec::with_capacity(options.len() + 4);
    if !descriptor.heap.trim().is_empty() {
        args.push(format!("{}{}", settings.heap_flag, descriptor.heap.trim()));
    }
    if !settings.classpath_flag.is_empty() {
        args.push(settings.classpath_flag.clone());
    }
    args.push(artifact.display().to_string());
    args.push(entry_point.to_string());
    args.extend(options.iter().cloned());

    let mut env = BTreeMap::new();
    if !settings.home_variable.is_empty() {
        env.insert(
            settings.home_variable.clone(),
            paths::simplified(env_dir).display().to_string(),
        );
    }
    env.extend(
        descriptor
            .env_vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    Ok(Invocation {
        program: runtime,
        args,
        env,
        artifact: Some(artifact),
    })
}

/// A running (or finished) child process whose output is being drained.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    command_line: String,
    child: Mutex<Child>,
    readers: Mutex<Vec<JoinHandle<()>>>,
}

impl ProcessHandle {
    pub fn id(&self) -> u32 {
        self.pid
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    fn child(&self) -> std::sync::MutexGuard<'_, Child> {
        self.child
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the exit status if the process has finished.
    pub fn try_status(&self) -> Option<ExitStatus> {
        match self.child().try_wait() {
            Ok(status) => status,
            Err(e) => {
                log::warn!("Could not query process {}: {}", self.pid, e);
                None
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.try_status().is_none()
    }

    /// Force-terminates the process without waiting for a graceful shutdown.
    /// Does nothing if the process already exited; safe to call repeatedly.
    pub fn destroy(&self) {
        let mut child = self.child();
        match child.try_wait() {
            Ok(Some(_)) => {}
            Ok(None) => {
                log::debug!("Killing child process (PID: {})...", self.pid);
                if let Err(e) = child.kill() {
                    log::debug!("Failed to kill child process {}: {}", self.pid, e);
                }
                // Reap it so it does not linger as a zombie.
                child.wait().ok();
            }
            Err(e) => log::warn!("Could not query process {}: {}", self.pid, e),
        }
    }

    /// Blocks until the process exits and both output streams are drained.
    ///
    /// The lock on the child is released between polls so `destroy` can be
    /// called from another thread while someone is waiting.
    pub fn wait(&self) -> Result<ExitStatus, LaunchError> {
        let status = loop {
            let polled = self.child().try_wait();
            match polled {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    return Err(LaunchError::Wait {
                        pid: self.pid,
                        source,
                    });
                }
            }
        };

        let readers = std::mem::take(
            &mut *self
                .readers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for reader in readers {
            if reader.join().is_err() {
                log::warn!("Output reader of process {} panicked.", self.pid);
            }
        }
        Ok(status)
    }
}

/// Validates and spawns the invocation, attaching one reader thread per output stream.
pub fn spawn(invocation: &Invocation, sink: &SharedSink) -> Result<ProcessHandle, LaunchError> {
    if let Some(artifact) = &invocation.artifact {
        if !artifact.is_file() {
            return Err(LaunchError::ArtifactMissing(artifact.display().to_string()));
        }
    }
    if looks_like_path(&invocation.program) && !Path::new(&invocation.program).is_file() {
        return Err(LaunchError::RuntimeNotFound(invocation.program.clone()));
    }

    let command_line = invocation.command_line();
    log::debug!("Launching: {}", command_line);

    let mut child = StdCommand::new(&invocation.program)
        .args(&invocation.args)
        .envs(&invocation.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => LaunchError::RuntimeNotFound(invocation.program.clone()),
            _ => LaunchError::SpawnFailed(command_line.clone(), e),
        })?;
    let pid = child.id();

    let mut readers = Vec::with_capacity(2);
    let streams: [(Option<Box<dyn Read + Send>>, StreamOrigin); 2] = [
        (
            child.stdout.take().map(|s| Box::new(s) as Box<dyn Read + Send>),
            StreamOrigin::Stdout,
        ),
        (
            child.stderr.take().map(|s| Box::new(s) as Box<dyn Read + Send>),
            StreamOrigin::Stderr,
        ),
    ];
    for (stream, origin) in streams {
        let Some(stream) = stream else { continue };
        let sink = Arc::clone(sink);
        let reader = thread::Builder::new()
            .name(format!("wekaenv-{origin}-{pid}"))
            .spawn(move || pump_lines(stream, origin, &sink));
        match reader {
            Ok(handle) => readers.push(handle),
            Err(e) => {
                child.kill().ok();
                child.wait().ok();
                return Err(LaunchError::SpawnFailed(command_line, e));
            }
        }
    }

    Ok(ProcessHandle {
        pid,
        command_line,
        child: Mutex::new(child),
        readers: Mutex::new(readers),
    })
}

/// Runs the invocation to completion. Returns whether the exit code was zero.
pub fn launch(invocation: &Invocation, sink: &SharedSink) -> Result<bool, LaunchError> {
    let handle = spawn(invocation, sink)?;
    let status = handle.wait()?;
    log::debug!(
        "Process {} finished: {}",
        handle.id(),
        describe_exit(status)
    );
    if !status.success() {
        sink.error(
            &format!(
                "Process '{}' ended with {}.",
                handle.command_line(),
                describe_exit(status)
            ),
            None,
        );
    }
    Ok(status.success())
}

/// Starts the invocation and returns immediately; the caller owns the handle.
pub fn launch_detached(
    invocation: &Invocation,
    sink: &SharedSink,
) -> Result<ProcessHandle, LaunchError> {
    spawn(invocation, sink)
}

/// Human-readable exit status.
pub fn describe_exit(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by a signal".to_string(),
    }
}

fn looks_like_path(program: &str) -> bool {
    program.contains('/') || program.contains(std::path::MAIN_SEPARATOR)
}

/// Forwards every line of `stream` to the sink until end-of-stream.
fn pump_lines(stream: Box<dyn Read + Send>, origin: StreamOrigin, sink: &SharedSink) {
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                sink.emit(line.trim_end_matches(['\n', '\r']), origin);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                log::debug!("Stopped reading {}: {}", origin, e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::output::CaptureSink;

    fn descriptor(artifact: &str) -> EnvironmentDescriptor {
        let mut d = EnvironmentDescriptor::new("envA", artifact);
        d.env_vars.insert("WEKA_HOME".to_string(), "/custom/home".to_string());
        d.env_vars.insert("LANG".to_string(), "C".to_string());
        d
    }

    #[test]
    fn test_build_uses_default_runtime_and_omits_empty_heap() {
        let settings = Settings::default();
        let d = EnvironmentDescriptor::new("envA", "/opt/weka/weka.jar");
        let inv = build(
            "weka.gui.explorer.Explorer",
            &["data.arff".to_string()],
            &d,
            Path::new("/envs/envA"),
            &settings,
        )
        .unwrap();

        assert_eq!(inv.program, "java");
        assert_eq!(
            inv.args,
            vec![
                "-cp",
                "/opt/weka/weka.jar",
                "weka.gui.explorer.Explorer",
                "data.arff"
            ]
        );
        assert_eq!(inv.env.get("WEKA_HOME").unwrap(), "/envs/envA");
    }

    #[test]
    fn test_build_adds_heap_flag_and_descriptor_variables_win() {
        let settings = Settings::default();
        let mut d = descriptor("/opt/weka/weka.jar");
        d.runtime = "/usr/lib/jvm/bin/java".to_string();
        d.heap = "2g".to_string();

        let inv = build("weka.Run", &[], &d, Path::new("/envs/envA"), &settings).unwrap();

        assert_eq!(inv.program, "/usr/lib/jvm/bin/java");
        assert_eq!(inv.args.first().map(String::as_str), Some("-Xmx2g"));
        assert_eq!(inv.env.get("WEKA_HOME").unwrap(), "/custom/home");
        assert_eq!(inv.env.get("LANG").unwrap(), "C");
    }

    #[test]
    fn test_command_line_quotes_arguments() {
        let inv = Invocation::new("java", ["-cp", "/my dir/weka.jar", "weka.Run"]);
        let line = inv.command_line();
        assert_eq!(
            shlex::split(&line).unwrap(),
            vec!["java", "-cp", "/my dir/weka.jar", "weka.Run"]
        );
    }

    #[test]
    fn test_missing_artifact_is_reported_before_spawning() {
        let sink: SharedSink = CaptureSink::shared();
        let mut inv = Invocation::new("java", ["-version"]);
        inv.artifact = Some(PathBuf::from("/definitely/missing/weka.jar"));
        assert!(matches!(
            launch(&inv, &sink),
            Err(LaunchError::ArtifactMissing(_))
        ));
    }

    #[test]
    fn test_missing_runtime_is_reported() {
        let sink: SharedSink = CaptureSink::shared();
        let by_path = Invocation::new("/definitely/missing/bin/java", ["-version"]);
        assert!(matches!(
            launch(&by_path, &sink),
            Err(LaunchError::RuntimeNotFound(_))
        ));
        let by_name = Invocation::new("wekaenv-no-such-runtime-4711", ["-version"]);
        assert!(matches!(
            launch(&by_name, &sink),
            Err(LaunchError::RuntimeNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_is_tagged_with_its_stream() {
        let capture = CaptureSink::shared();
        let sink: SharedSink = capture.clone();
        let inv = Invocation::new("sh", ["-c", "echo A; echo B 1>&2"]);

        assert!(launch(&inv, &sink).unwrap());

        assert_eq!(capture.stdout(), vec!["A"]);
        assert_eq!(capture.stderr(), vec!["B"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_failure() {
        let capture = CaptureSink::shared();
        let sink: SharedSink = capture.clone();
        let inv = Invocation::new("sh", ["-c", "exit 3"]);
        assert!(!launch(&inv, &sink).unwrap());
        assert!(capture.contains("exit code 3"));
    }

    #[cfg(unix)]
    #[test]
    fn test_environment_is_overlaid_onto_inherited_one() {
        let capture = CaptureSink::shared();
        let sink: SharedSink = capture.clone();
        let mut inv = Invocation::new("sh", ["-c", "echo \"$WEKAENV_TEST_VAR\"; test -n \"$PATH\""]);
        inv.env
            .insert("WEKAENV_TEST_VAR".to_string(), "overlaid".to_string());

        assert!(launch(&inv, &sink).unwrap());
        assert_eq!(capture.stdout(), vec!["overlaid"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_large_output_on_both_streams_does_not_stall() {
        let capture = CaptureSink::shared();
        let sink: SharedSink = capture.clone();
        let inv = Invocation::new("sh", ["-c", "seq 1 50000; seq 1 50000 1>&2"]);

        assert!(launch(&inv, &sink).unwrap());
        assert_eq!(capture.stdout().len(), 50000);
        assert_eq!(capture.stderr().len(), 50000);
        assert_eq!(capture.stdout().last().map(String::as_str), Some("50000"));
    }

    #[cfg(unix)]
    #[test]
    fn test_destroy_is_idempotent_and_isolated() {
        let sink: SharedSink = CaptureSink::shared();
        let first = launch_detached(&Invocation::new("sh", ["-c", "exec sleep 30"]), &sink).unwrap();
        let second = launch_detached(&Invocation::new("sh", ["-c", "exec sleep 30"]), &sink).unwrap();
        assert!(first.is_running());

        first.destroy();
        first.destroy();

        assert!(!first.is_running());
        assert!(!first.wait().unwrap().success());
        assert!(second.is_running());

        second.destroy();
        assert!(!second.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_destroy_after_natural_exit_is_a_no_op() {
        let sink: SharedSink = CaptureSink::shared();
        let handle = launch_detached(&Invocation::new("sh", ["-c", "exit 0"]), &sink).unwrap();
        assert!(handle.wait().unwrap().success());

        handle.destroy();
        handle.destroy();
        assert_eq!(handle.try_status().map(|s| s.success()), Some(true));
    }

    #[cfg(unix)]
    #[test]
    fn test_destroy_unblocks_a_concurrent_wait() {
        let sink: SharedSink = CaptureSink::shared();
        let handle = Arc::new(
            launch_detached(&Invocation::new("sh", ["-c", "exec sleep 30"]), &sink).unwrap(),
        );
        let waiter = {
            let handle = Arc::clone(&handle);
            thread::spawn(move || handle.wait().map(|s| s.success()))
        };

        thread::sleep(Duration::from_millis(100));
        handle.destroy();

        assert!(!waiter.join().unwrap().unwrap());
    }
}
