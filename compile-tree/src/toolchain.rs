//! Finding the compiler from the command line and the environment
//!
//! This is the only place that reads the environment. The JDK home comes
//! from `--jdk`, then `TEST_JDK`, then `JAVA_HOME`.

use clap::Args;
use compile_tree_core::Compiler;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Clone, Default)]
pub struct ToolchainArgs {
    /// JDK home containing bin/javac (falls back to JAVA_HOME)
    #[arg(long, value_name = "DIR", env = "TEST_JDK")]
    pub jdk: Option<PathBuf>,
}

impl ToolchainArgs {
    pub fn home(&self) -> Option<PathBuf> {
        resolve_home(self.jdk.clone(), env::var_os("JAVA_HOME"))
    }

    /// The compiler inside the resolved home, if there is one
    pub fn compiler(&self) -> Option<Compiler> {
        let Some(home) = self.home() else {
            debug!("no JDK home configured");
            return None;
        };
        let compiler = Compiler::locate(&home);
        debug!(home = %home.display(), found = compiler.is_some(), "resolved JDK home");
        compiler
    }
}

fn resolve_home(explicit: Option<PathBuf>, java_home: Option<OsString>) -> Option<PathBuf> {
    explicit.or_else(|| {
        java_home
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}
