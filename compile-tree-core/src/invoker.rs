//! Compiling a source tree
//!
//! [`CompileInvoker::compile`] runs one request through a fixed sequence:
//! resolve the compiler, scan the source root, create the destination,
//! assemble the command line, run it and interpret the exit status. The
//! first failing step ends the operation; nothing is retried.

use crate::compiler::Compiler;
use crate::error::CompileError;
use crate::invocation::CompilerInvocation;
use crate::scanner::SourceTreeScanner;
use compile_tree_process::{ProcessRunner, SystemProcessRunner};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One compilation: what to compile, where to put it, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    source_root: PathBuf,
    destination_root: PathBuf,
    recurse: bool,
    extra_options: Vec<String>,
}

impl CompileRequest {
    /// Compile everything under `source_root`, subdirectories included,
    /// into `destination_root`.
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            recurse: true,
            extra_options: Vec::new(),
        }
    }

    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Append one compiler option
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.extra_options.push(option.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_options.extend(options.into_iter().map(Into::into));
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    pub fn recurses(&self) -> bool {
        self.recurse
    }

    pub fn extra_options(&self) -> &[String] {
        &self.extra_options
    }
}

/// Runs a compiler over source trees.
///
/// Holds no mutable state, so one invoker can serve concurrent requests as
/// long as they write to different destinations.
#[derive(Debug, Clone)]
pub struct CompileInvoker<R = SystemProcessRunner> {
    compiler: Option<Compiler>,
    scanner: SourceTreeScanner,
    runner: R,
}

impl CompileInvoker<SystemProcessRunner> {
    /// Invoker that runs the compiler as a real subprocess
    pub fn system(compiler: Option<Compiler>) -> Self {
        Self::new(compiler, SystemProcessRunner::new())
    }
}

impl<R: ProcessRunner> CompileInvoker<R> {
    /// `compiler` is `None` when the environment has no compiler; every
    /// request then fails with [`CompileError::UnsupportedCapability`].
    pub fn new(compiler: Option<Compiler>, runner: R) -> Self {
        Self {
            compiler,
            scanner: SourceTreeScanner::new(),
            runner,
        }
    }

    /// Match source files by `suffix` instead of `.java`
    pub fn with_source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.scanner = SourceTreeScanner::with_suffix(suffix);
        self
    }

    pub fn compiler(&self) -> Option<&Compiler> {
        self.compiler.as_ref()
    }

    pub fn scanner(&self) -> &SourceTreeScanner {
        &self.scanner
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn resolve_compiler(&self) -> Result<&Compiler, CompileError> {
        self.compiler.as_ref().ok_or_else(CompileError::no_compiler)
    }

    /// Build the command line for `request` without creating the destination
    /// or running anything.
    pub fn invocation(&self, request: &CompileRequest) -> Result<CompilerInvocation, CompileError> {
        let compiler = self.resolve_compiler()?;
        let sources = self.scanner.scan(request.source_root(), request.recurses())?;
        Ok(CompilerInvocation::new(
            compiler,
            request.destination_root(),
            request.extra_options(),
            &sources,
        ))
    }

    /// Compile `request`.
    ///
    /// Succeeds only when the compiler exits with status 0, returning the
    /// number of source files it was given. An empty source tree still runs
    /// the compiler, with no source arguments, and its exit status decides
    /// the outcome.
    pub fn compile(&self, request: &CompileRequest) -> Result<usize, CompileError> {
        let compiler = self.resolve_compiler()?;
        let sources = self.scanner.scan(request.source_root(), request.recurses())?;

        let destination = request.destination_root();
        fs::create_dir_all(destination).map_err(|source| CompileError::file_system(destination, source))?;

        let invocation =
            CompilerInvocation::new(compiler, destination, request.extra_options(), &sources);
        let command = invocation.command_line();
        debug!(sources = sources.len(), %command, "assembled compiler invocation");

        let output = self
            .runner
            .run(invocation.program(), invocation.arguments())
            .map_err(|source| CompileError::Launch {
                command: command.clone(),
                source,
            })?;

        if output.success() {
            info!(
                sources = sources.len(),
                destination = %destination.display(),
                "compilation succeeded"
            );
            Ok(sources.len())
        } else {
            info!(status = %output.describe_status(), "compilation failed");
            Err(CompileError::CompilationFailed { command, output })
        }
    }
}
