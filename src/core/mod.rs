// src/core/mod.rs

pub mod command;
pub mod paths;
pub mod script;
pub mod settings;
pub mod store;
pub mod variables;
