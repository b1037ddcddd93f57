//! # System Interaction Layer
//!
//! Abstractions over the operating system used by the commands.
//!
//! ## Modules
//!
//! - **`launcher`**: builds the invocation of a toolkit entry point for an
//!   environment, spawns it with the environment's variables and drains its
//!   standard streams on two reader threads. Children can be awaited or
//!   destroyed.
//! - **`output`**: the sink through which commands and children report lines
//!   and errors, with a terminal and an in-memory implementation.

pub mod launcher;
pub mod output;
