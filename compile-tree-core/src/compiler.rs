//! Locating the compiler executable inside a JDK installation.

use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the Java compiler, without any platform suffix
pub const JAVAC: &str = "javac";

/// A compiler executable that a [`CompileInvoker`](crate::CompileInvoker) can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    executable: PathBuf,
}

impl Compiler {
    /// Wrap an explicit executable path. No check is made that it exists.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The conventional compiler location inside `home`: `<home>/bin/javac`.
    pub fn in_home(home: impl AsRef<Path>) -> Self {
        let binary = format!("{}{}", JAVAC, env::consts::EXE_SUFFIX);
        Self::new(home.as_ref().join("bin").join(binary))
    }

    /// Like [`Compiler::in_home`], but only if the executable is actually there
    pub fn locate(home: impl AsRef<Path>) -> Option<Self> {
        let compiler = Self::in_home(home);
        if compiler.executable.is_file() {
            Some(compiler)
        } else {
            debug!(path = %compiler.executable.display(), "no compiler at expected location");
            None
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}
