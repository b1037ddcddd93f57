// src/cli/handlers/script_ops/mod.rs

// Commands that only make sense inside scripts: they read and write script variables.

pub mod base_name;
pub mod dir_name;
pub mod echo;
pub mod get_env;
pub mod set_var;
