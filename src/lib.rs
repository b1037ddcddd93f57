//! wekaenv manages named, isolated Weka environments and launches toolkit
//! applications inside them.
//!
//! The layers, leaves first: [`core::variables`] and [`core::store`] hold
//! state, [`system::launcher`] runs children, [`core::command`] defines the
//! unit of work, [`core::script`] runs sequences of commands and
//! [`cli::dispatcher`] routes a verb to its command.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
