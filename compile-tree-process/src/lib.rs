//! Process execution for compile-tree
//!
//! Spawns external programs, captures and forwards their output, and offers
//! assertions over the captured result. The [`ProcessRunner`] trait lets
//! callers substitute an in-memory stub for the real operating system.

#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod output;
pub mod runner;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

pub use error::ProcessError;
pub use output::ProcessOutput;
pub use runner::{ProcessRunner, SystemProcessRunner, render_command_line};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
