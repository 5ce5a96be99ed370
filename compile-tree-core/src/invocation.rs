//! The compiler command line
//!
//! Argument order is fixed: `<compiler> -d <destination> <options>... <sources>...`.

use crate::compiler::Compiler;
use crate::scanner::SourceFileSet;
use compile_tree_process::render_command_line;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// Flag that tells the compiler where to write its output
pub const DESTINATION_FLAG: &str = "-d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInvocation {
    program: PathBuf,
    arguments: Vec<OsString>,
}

impl CompilerInvocation {
    pub fn new(
        compiler: &Compiler,
        destination: &Path,
        options: &[String],
        sources: &SourceFileSet,
    ) -> Self {
        let mut arguments = Vec::with_capacity(2 + options.len() + sources.len());
        arguments.push(OsString::from(DESTINATION_FLAG));
        arguments.push(destination.as_os_str().to_owned());
        arguments.extend(options.iter().map(OsString::from));
        arguments.extend(sources.iter().map(|source| source.as_os_str().to_owned()));

        Self {
            program: compiler.executable().to_path_buf(),
            arguments,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Everything after the program name
    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(1 + self.arguments.len());
        argv.push(self.program.as_os_str().to_owned());
        argv.extend(self.arguments.iter().cloned());
        argv
    }

    pub fn command_line(&self) -> String {
        render_command_line(&self.program, &self.arguments)
    }
}

impl fmt::Display for CompilerInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}
