// compile-tree core library
// Scans a source tree and compiles it with an external compiler

#![allow(clippy::uninlined_format_args)]

pub mod compiler;
pub mod error;
pub mod invocation;
pub mod invoker;
pub mod scanner;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

pub use compiler::{Compiler, JAVAC};
pub use error::CompileError;
pub use invocation::{CompilerInvocation, DESTINATION_FLAG};
pub use invoker::{CompileInvoker, CompileRequest};
pub use scanner::{SourceFileSet, SourceTreeScanner, JAVA_SOURCE_SUFFIX};

pub use compile_tree_process::{ProcessError, ProcessOutput, ProcessRunner, SystemProcessRunner};

use std::path::Path;

/// Compile every `.java` file under `source`, subdirectories included, into
/// `destination` using the system process runner. Returns the number of
/// source files compiled.
pub fn compile<I, S>(
    compiler: Option<Compiler>,
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: I,
) -> Result<usize, CompileError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let request = CompileRequest::new(source.as_ref(), destination.as_ref()).options(options);
    CompileInvoker::system(compiler).compile(&request)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
