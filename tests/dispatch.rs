// tests/dispatch.rs

use std::{fs, path::PathBuf, sync::Arc};
use tempfile::TempDir;
use wekaenv::{
    cli::{
        dispatcher::{DispatchError, Dispatcher},
        registry::Registry,
    },
    core::{settings::Settings, store::StoreError},
    models::EnvironmentDescriptor,
    system::output::{CaptureSink, SharedSink},
};

struct Harness {
    dir: TempDir,
    dispatcher: Dispatcher,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = wekaenv::core::store::EnvironmentStore::open(dir.path().join("envs")).unwrap();
        let dispatcher = Dispatcher::new(Registry::standard(), store, Settings::default());
        Self { dir, dispatcher }
    }

    /// Writes a fake toolkit jar and returns its path.
    fn artifact(&self, name: &str) -> String {
        let path: PathBuf = self.dir.path().join(name);
        fs::write(&path, b"PK").unwrap();
        path.display().to_string()
    }

    fn run(&self, args: &[&str]) -> (bool, Arc<CaptureSink>) {
        let capture = CaptureSink::shared();
        let sink: SharedSink = capture.clone();
        let argv: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        (self.dispatcher.dispatch(&argv, &sink), capture)
    }

    fn try_run(&self, args: &[&str]) -> Result<bool, DispatchError> {
        let sink: SharedSink = CaptureSink::shared();
        let argv: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.dispatcher.try_dispatch(&argv, &sink)
    }

    fn load(&self, name: &str) -> EnvironmentDescriptor {
        self.dispatcher.store().load(name).unwrap()
    }
}

#[test]
fn every_command_prints_help() {
    let harness = Harness::new();
    let names = harness.dispatcher.registry().names();
    assert!(names.len() >= 20);

    for name in names {
        let (success, capture) = harness.run(&[name, "--help"]);
        assert!(success, "'{} --help' failed", name);
        let stdout = capture.stdout();
        assert!(!stdout.is_empty(), "'{} --help' printed nothing", name);
        assert!(stdout[0].starts_with(name));
        assert!(capture.errors().is_empty());
    }
}

#[test]
fn unknown_command_lists_available_ones() {
    let harness = Harness::new();
    match harness.try_run(&["nonexistent"]) {
        Err(DispatchError::UnknownCommand { name, available }) => {
            assert_eq!(name, "nonexistent");
            for expected in ["create", "clone", "delete", "list", "script", "explorer"] {
                assert!(available.contains(expected), "missing '{}'", expected);
            }
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let (success, capture) = harness.run(&["nonexistent"]);
    assert!(!success);
    assert_eq!(capture.errors().len(), 1);
    assert!(capture.errors()[0].contains("nonexistent"));
}

#[test]
fn no_command_is_an_error() {
    let harness = Harness::new();
    assert!(matches!(
        harness.try_run(&[]),
        Err(DispatchError::NoCommand { .. })
    ));
}

#[test]
fn create_then_clone_with_heap_override() {
    let harness = Harness::new();
    let artifact = harness.artifact("toolkit-1.jar");

    let (created, _) = harness.run(&["create", "--name", "envA", "--artifact", artifact.as_str()]);
    assert!(created);
    let (cloned, _) = harness.run(&["clone", "--old", "envA", "--new", "envB", "--heap", "2g"]);
    assert!(cloned);

    let env_b = harness.load("envB");
    assert_eq!(env_b.name, "envB");
    assert_eq!(env_b.artifact, artifact);
    assert_eq!(env_b.heap, "2g");

    let env_a = harness.load("envA");
    assert_eq!(env_a.name, "envA");
    assert_eq!(env_a.artifact, artifact);
    assert_eq!(env_a.heap, "");
}

#[test]
fn create_and_clone_refuse_existing_names() {
    let harness = Harness::new();
    let first = harness.artifact("toolkit-1.jar");
    let second = harness.artifact("toolkit-2.jar");

    assert!(harness.run(&["create", "--name", "envA", "--artifact", first.as_str()]).0);
    assert!(harness.run(&["create", "--name", "envB", "--artifact", second.as_str()]).0);

    let (success, capture) = harness.run(&["create", "--name", "envA", "--artifact", second.as_str()]);
    assert!(!success);
    assert!(capture.contains("already exists"));
    assert_eq!(harness.load("envA").artifact, first);

    let (success, _) = harness.run(&["clone", "--old", "envA", "--new", "envB"]);
    assert!(!success);
    assert_eq!(harness.load("envB").artifact, second);
}

#[test]
fn create_requires_an_existing_artifact() {
    let harness = Harness::new();
    let missing = harness.dir.path().join("missing.jar").display().to_string();

    let (success, _) = harness.run(&["create", "--name", "envA", "--artifact", missing.as_str()]);
    assert!(!success);
    assert!(!harness.dispatcher.store().exists("envA"));
    assert!(harness.dispatcher.store().list().unwrap().is_empty());
}

#[test]
fn missing_options_are_usage_errors() {
    let harness = Harness::new();
    assert!(matches!(
        harness.try_run(&["create", "--name", "envA"]),
        Err(DispatchError::Usage { .. })
    ));
    assert!(matches!(
        harness.try_run(&["list", "extra"]),
        Err(DispatchError::Usage { .. })
    ));
}

#[test]
fn environment_commands_need_an_existing_environment() {
    let harness = Harness::new();
    assert!(matches!(
        harness.try_run(&["info"]),
        Err(DispatchError::MissingEnvironment { .. })
    ));
    assert!(matches!(
        harness.try_run(&["info", "--json"]),
        Err(DispatchError::MissingEnvironment { .. })
    ));
    assert!(matches!(
        harness.try_run(&["explorer", "ghost"]),
        Err(DispatchError::Environment(StoreError::NotFound { .. }))
    ));
}

#[test]
fn script_only_commands_are_rejected_at_top_level() {
    let harness = Harness::new();
    assert!(matches!(
        harness.try_run(&["set_var", "--name", "a", "--value", "b"]),
        Err(DispatchError::ScriptOnly { .. })
    ));
    assert!(matches!(
        harness.try_run(&["echo", "hello"]),
        Err(DispatchError::ScriptOnly { .. })
    ));
}

#[test]
fn delete_is_idempotent() {
    let harness = Harness::new();
    let artifact = harness.artifact("toolkit-1.jar");
    assert!(harness.run(&["create", "--name", "envA", "--artifact", artifact.as_str()]).0);
    fs::write(harness.dispatcher.store().env_dir("envA").join("models.txt"), "x").unwrap();

    assert!(harness.run(&["delete", "--name", "envA"]).0);
    assert!(!harness.dispatcher.store().env_dir("envA").exists());

    let (success, capture) = harness.run(&["delete", "--name", "envA"]);
    assert!(success);
    assert!(capture.contains("does not exist"));
}

#[test]
fn update_edits_fields_in_place() {
    let harness = Harness::new();
    let artifact = harness.artifact("toolkit-1.jar");
    assert!(
        harness
            .run(&[
                "create", "--name", "envA", "--artifact", artifact.as_str(), "--env", "A=1", "--env",
                "B=2",
            ])
            .0
    );

    let (success, _) = harness.run(&[
        "update",
        "envA",
        "--heap",
        "4g",
        "--env",
        "C=3",
        "--unset-env",
        "A",
    ]);
    assert!(success);

    let env_a = harness.load("envA");
    assert_eq!(env_a.heap, "4g");
    assert_eq!(env_a.artifact, artifact);
    assert_eq!(
        env_a.env_vars.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["B", "C"]
    );

    let (nothing, _) = harness.run(&["update", "envA"]);
    assert!(!nothing);
}

#[test]
fn list_reports_names_and_json() {
    let harness = Harness::new();
    let artifact = harness.artifact("toolkit-1.jar");
    for name in ["zeta", "alpha", "mid"] {
        assert!(harness.run(&["create", "--name", name, "--artifact", artifact.as_str()]).0);
    }

    let (success, capture) = harness.run(&["list"]);
    assert!(success);
    assert_eq!(capture.stdout(), vec!["alpha", "mid", "zeta"]);

    let (success, capture) = harness.run(&["list", "--json"]);
    assert!(success);
    let descriptors: Vec<EnvironmentDescriptor> =
        serde_json::from_str(&capture.stdout().join("\n")).unwrap();
    assert_eq!(descriptors.len(), 3);
    assert_eq!(descriptors[0].name, "alpha");
    assert!(descriptors.iter().all(|d| d.artifact == artifact));
}

#[test]
fn info_prints_descriptor_as_json() {
    let harness = Harness::new();
    let artifact = harness.artifact("toolkit-1.jar");
    assert!(
        harness
            .run(&["create", "--name", "envA", "--artifact", artifact.as_str(), "--heap", "1g"])
            .0
    );

    let (success, capture) = harness.run(&["info", "envA", "--json"]);
    assert!(success);
    let descriptor: EnvironmentDescriptor =
        serde_json::from_str(&capture.stdout().join("\n")).unwrap();
    assert_eq!(descriptor, harness.load("envA"));
}

#[test]
fn list_cmds_shows_every_command() {
    let harness = Harness::new();
    let (success, capture) = harness.run(&["list_cmds"]);
    assert!(success);
    for name in harness.dispatcher.registry().names() {
        assert!(
            capture.stdout().iter().any(|line| line.starts_with(name)),
            "'{}' missing from list_cmds",
            name
        );
    }
}
