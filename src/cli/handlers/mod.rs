// src/cli/handlers/mod.rs

// One module per command; each exposes the factory the registry refers to.

pub mod clone;
pub mod commons;
pub mod create;
pub mod delete;
pub mod info;
pub mod launch;
pub mod list;
pub mod list_cmds;
pub mod run;
pub mod script;
pub mod script_ops;
pub mod update;
