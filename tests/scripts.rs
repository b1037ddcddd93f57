// tests/scripts.rs

use std::{fs, path::Path, sync::Arc};
use tempfile::TempDir;
use wekaenv::{
    cli::{dispatcher::Dispatcher, registry::Registry},
    core::{settings::Settings, store::EnvironmentStore},
    system::output::{CaptureSink, SharedSink},
};

fn setup() -> (TempDir, Dispatcher, String) {
    let dir = tempfile::tempdir().unwrap();
    let store = EnvironmentStore::open(dir.path().join("envs")).unwrap();
    let artifact = dir.path().join("toolkit-1.jar");
    fs::write(&artifact, b"PK").unwrap();
    let artifact = artifact.display().to_string();
    (
        dir,
        Dispatcher::new(Registry::standard(), store, Settings::default()),
        artifact,
    )
}

fn write_script(dir: &Path, body: &str) -> String {
    let path = dir.join("steps.wenv");
    fs::write(&path, body).unwrap();
    path.display().to_string()
}

fn run_script(dispatcher: &Dispatcher, script: &str, vars: &[&str]) -> (bool, Arc<CaptureSink>) {
    let capture = CaptureSink::shared();
    let sink: SharedSink = capture.clone();
    let mut argv = vec!["script".to_string(), script.to_string()];
    for var in vars {
        argv.push("--var".to_string());
        argv.push(var.to_string());
    }
    (dispatcher.dispatch(&argv, &sink), capture)
}

#[test]
fn derived_variables_reach_later_steps() {
    let (dir, dispatcher, artifact) = setup();
    let script = write_script(
        dir.path(),
        "# build two environments from one jar\n\
         create --name envA --artifact ${art}\n\
         base_name --file ${art} --dest dest\n\
         echo jar is ${dest}\n\
         clone --old envA --new envB --heap 2g\n",
    );

    let art = format!("art={}", artifact);
    let (success, capture) = run_script(&dispatcher, &script, &[art.as_str()]);
    assert!(success, "errors: {:?}", capture.events());
    assert!(capture.stdout().contains(&"jar is toolkit-1.jar".to_string()));

    let env_b = dispatcher.store().load("envB").unwrap();
    assert_eq!(env_b.heap, "2g");
    assert_eq!(env_b.artifact, artifact);
}

#[test]
fn failing_step_stops_the_script() {
    let (dir, dispatcher, artifact) = setup();
    let script = write_script(
        dir.path(),
        "create --name one --artifact ${art}\n\
         create --name one --artifact ${art}\n\
         create --name three --artifact ${art}\n",
    );

    let art = format!("art={}", artifact);
    let (success, capture) = run_script(&dispatcher, &script, &[art.as_str()]);
    assert!(!success);
    assert!(capture.contains("Line 2"));
    assert!(dispatcher.store().exists("one"));
    assert!(!dispatcher.store().exists("three"));
}

#[test]
fn unresolved_reference_fails_the_step() {
    let (dir, dispatcher, _artifact) = setup();
    let script = write_script(dir.path(), "echo start\necho ${nope}\necho never\n");

    let (success, capture) = run_script(&dispatcher, &script, &[]);
    assert!(!success);
    assert_eq!(capture.stdout(), vec!["start"]);
    assert!(capture.contains("nope"));
}

#[test]
fn dollar_escape_and_predefined_variables() {
    let (dir, dispatcher, _artifact) = setup();
    let script = write_script(
        dir.path(),
        "echo price $$5\n\
         base_name --file ${script_file} --dest me\n\
         echo ${me}\n\
         set_var --name greeting --value hello\n\
         echo ${greeting}-world\n",
    );

    let (success, capture) = run_script(&dispatcher, &script, &[]);
    assert!(success, "errors: {:?}", capture.events());
    assert_eq!(
        capture.stdout(),
        vec!["price $5", "steps.wenv", "hello-world"]
    );
}

#[test]
fn dir_name_and_get_env_with_default() {
    let (dir, dispatcher, _artifact) = setup();
    let script = write_script(
        dir.path(),
        "dir_name --file /data/sets/iris.arff --dest d\n\
         get_env --name WEKAENV_TEST_SURELY_UNSET_VARIABLE --dest v --default fallback\n\
         echo ${d} ${v}\n",
    );

    let (success, capture) = run_script(&dispatcher, &script, &[]);
    assert!(success, "errors: {:?}", capture.events());
    assert_eq!(capture.stdout(), vec!["/data/sets fallback"]);
}

#[test]
fn general_commands_are_not_allowed_in_scripts() {
    let (dir, dispatcher, _artifact) = setup();
    let script = write_script(dir.path(), "echo before\nlist_cmds\necho after\n");

    let (success, capture) = run_script(&dispatcher, &script, &[]);
    assert!(!success);
    assert_eq!(capture.stdout(), vec!["before"]);
    assert!(capture.contains("cannot be used inside scripts"));
}

#[test]
fn missing_script_file_is_reported() {
    let (dir, dispatcher, _artifact) = setup();
    let missing = dir.path().join("nope.wenv").display().to_string();

    let (success, capture) = run_script(&dispatcher, &missing, &[]);
    assert!(!success);
    assert_eq!(capture.errors().len(), 1);
}

#[test]
fn echo_prints_help_flags_as_words() {
    let (dir, dispatcher, _artifact) = setup();
    let script = write_script(dir.path(), "echo use -h for help\necho -- --help\n");

    let (success, capture) = run_script(&dispatcher, &script, &[]);
    assert!(success, "errors: {:?}", capture.events());
    assert_eq!(capture.stdout(), vec!["use -h for help", "--help"]);
}
