// compile-tree error taxonomy
// Every failure of a compile operation is one of these, never a boolean.

use compile_tree_process::{ProcessError, ProcessOutput};
use miette::Diagnostic;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub(crate) const NO_COMPILER_MESSAGE: &str =
    "Unable to locate a Java compiler. Perhaps only a runtime image without javac is installed.";

#[derive(Error, Diagnostic, Debug)]
pub enum CompileError {
    #[error("Filesystem error at {}", .path.display())]
    #[diagnostic(
        code(compile_tree::file_system),
        help("Check that the path exists, is a directory where one is expected, and is accessible")
    )]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{message}")]
    #[diagnostic(
        code(compile_tree::unsupported_capability),
        help("Point --jdk, TEST_JDK or JAVA_HOME at a JDK home that contains bin/javac")
    )]
    UnsupportedCapability { message: String },

    #[error("Compilation failed ({}): {command}", .output.describe_status())]
    #[diagnostic(
        code(compile_tree::compilation_failed),
        help("The compiler's diagnostics are attached to this error and were forwarded as they were produced")
    )]
    CompilationFailed {
        command: String,
        output: ProcessOutput,
    },

    #[error("Could not run compiler: {command}")]
    #[diagnostic(code(compile_tree::launch))]
    Launch {
        command: String,
        #[source]
        #[diagnostic_source]
        source: ProcessError,
    },
}

impl CompileError {
    pub fn file_system(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::FileSystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The environment has no compiler; retrying cannot help
    pub fn no_compiler() -> Self {
        Self::UnsupportedCapability {
            message: NO_COMPILER_MESSAGE.to_string(),
        }
    }

    /// True when the failure is about the environment rather than the code
    /// being compiled.
    pub fn is_environmental(&self) -> bool {
        matches!(self, Self::UnsupportedCapability { .. })
    }

    /// Captured compiler output, for failures that ran the compiler
    pub fn output(&self) -> Option<&ProcessOutput> {
        match self {
            Self::CompilationFailed { output, .. } => Some(output),
            _ => None,
        }
    }

    /// The command line that failed, when one was assembled
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::CompilationFailed { command, .. } | Self::Launch { command, .. } => Some(command),
            _ => None,
        }
    }
}
