// src/cli/handlers/commons.rs

// Shared helpers for the environment handlers.

use crate::{
    core::{store::EnvironmentStore, variables},
    models::EnvironmentDescriptor,
    system::output::SharedSink,
};
use anyhow::{Result, anyhow};
use colored::Colorize;
use std::collections::BTreeMap;

/// Parses repeated `KEY=VALUE` options into a map. Later assignments win.
pub fn parse_env_assignments(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();
    for item in raw {
        let (key, value) = variables::parse_assignment(item)
            .ok_or_else(|| anyhow!("Invalid assignment '{}', expected KEY=VALUE.", item))?;
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}

/// Shows an empty field as the default it stands for.
pub fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

/// Prints the fields of a descriptor, one per line.
pub fn print_descriptor(
    sink: &SharedSink,
    store: &EnvironmentStore,
    descriptor: &EnvironmentDescriptor,
    default_runtime: &str,
) {
    sink.println(&format!("--- Environment '{}' ---", descriptor.name.yellow()));
    let rows = [
        ("runtime", or_default(&descriptor.runtime, default_runtime).to_string()),
        ("heap", or_default(&descriptor.heap, "(runtime default)").to_string()),
        ("artifact", descriptor.artifact.clone()),
        ("directory", store.env_dir(&descriptor.name).display().to_string()),
    ];
    for (label, value) in rows {
        sink.println(&format!("  {:<10} {}", label.blue(), value));
    }
    if descriptor.env_vars.is_empty() {
        sink.println(&format!("  {:<10} {}", "env".blue(), "(none)".dimmed()));
    } else {
        sink.println(&format!("  {}", "env".blue()));
        for (key, value) in &descriptor.env_vars {
            sink.println(&format!("    {}={}", key, value));
        }
    }
}
