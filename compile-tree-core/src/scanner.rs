//! Source tree scanning
//!
//! Walks a source root and collects the files the compiler should see.
//! Entries are visited in file name order within each directory so that the
//! resulting command line is the same on every run.

use crate::error::CompileError;
use indexmap::IndexSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Suffix of Java source files
pub const JAVA_SOURCE_SUFFIX: &str = ".java";

/// Absolute paths of matching source files, in traversal order
pub type SourceFileSet = IndexSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTreeScanner {
    suffix: String,
}

impl Default for SourceTreeScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTreeScanner {
    /// Scanner for `.java` files
    pub fn new() -> Self {
        Self::with_suffix(JAVA_SOURCE_SUFFIX)
    }

    /// Scanner matching file names that end with `suffix`
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Collect every matching file under `source_root`.
    ///
    /// Without `recurse` only the root's direct children are considered.
    /// The root has to be an existing directory; a missing root or any error
    /// during the walk is returned as [`CompileError::FileSystem`]. An empty
    /// result is not an error.
    pub fn scan(&self, source_root: &Path, recurse: bool) -> Result<SourceFileSet, CompileError> {
        let root = std::path::absolute(source_root)
            .map_err(|source| CompileError::file_system(source_root, source))?;

        let metadata = fs::metadata(&root).map_err(|source| CompileError::file_system(&root, source))?;
        if !metadata.is_dir() {
            return Err(CompileError::file_system(
                &root,
                io::Error::new(io::ErrorKind::NotADirectory, "source root is not a directory"),
            ));
        }

        let max_depth = if recurse { usize::MAX } else { 1 };
        let mut sources = SourceFileSet::new();

        for entry in WalkDir::new(&root).max_depth(max_depth).sort_by_file_name() {
            let entry = entry.map_err(|err| walk_error(&root, err))?;
            if self.matches(&entry) {
                sources.insert(entry.into_path());
            }
        }

        debug!(
            root = %root.display(),
            recurse,
            count = sources.len(),
            "scanned source tree"
        );
        Ok(sources)
    }

    fn matches(&self, entry: &DirEntry) -> bool {
        let file_type = entry.file_type();
        let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
        is_file && entry.file_name().to_string_lossy().ends_with(&self.suffix)
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> CompileError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let message = err.to_string();
    let source = err.into_io_error().unwrap_or_else(|| io::Error::other(message));
    CompileError::file_system(path, source)
}
