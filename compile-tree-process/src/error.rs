//! Errors raised while running external processes and checking their output.

use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by a [`ProcessRunner`](crate::ProcessRunner) or by the
/// assertion helpers on [`ProcessOutput`](crate::ProcessOutput).
#[derive(Error, Diagnostic, Debug)]
pub enum ProcessError {
    #[error("Failed to start {}", .program.display())]
    #[diagnostic(
        code(compile_tree::process::spawn),
        help("Check that the program exists and is executable")
    )]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while {action}")]
    #[diagnostic(code(compile_tree::process::io))]
    Io {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Expected exit value {expected}, got {status}")]
    #[diagnostic(code(compile_tree::process::unexpected_exit_value))]
    UnexpectedExitValue {
        expected: i32,
        status: String,
        #[help]
        output: Option<String>,
    },

    #[error("Expected process output to contain {expected:?}")]
    #[diagnostic(code(compile_tree::process::missing_output))]
    MissingOutput {
        expected: String,
        #[help]
        output: Option<String>,
    },

    #[error("Process output unexpectedly contains {unexpected:?}")]
    #[diagnostic(code(compile_tree::process::unexpected_output))]
    UnexpectedOutput {
        unexpected: String,
        #[help]
        output: Option<String>,
    },

    #[error("Expected stderr to be empty")]
    #[diagnostic(code(compile_tree::process::unexpected_stderr))]
    UnexpectedStderr {
        #[help]
        stderr: Option<String>,
    },
}

impl ProcessError {
    /// Create an I/O error for the given activity
    pub fn io(action: &'static str, source: io::Error) -> Self {
        Self::Io { action, source }
    }
}

/// Render captured text for a diagnostic help section, skipping empty output.
pub(crate) fn captured(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(format!("captured output:\n{}", text.trim_end()))
    }
}
