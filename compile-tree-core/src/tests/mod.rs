//! Unit tests for scanning, command assembly and compilation

pub mod test_invocation_order;

use crate::{ProcessError, ProcessOutput, ProcessRunner};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory runner that records each call and replies with a fixed output
pub struct StubRunner {
    reply: ProcessOutput,
    calls: Mutex<Vec<Vec<OsString>>>,
}

impl StubRunner {
    pub fn exiting_with(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            reply: ProcessOutput::new(Some(code), stdout, stderr),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every recorded argv, program first
    pub fn calls(&self) -> Vec<Vec<OsString>> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessRunner for StubRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput, ProcessError> {
        let mut argv = vec![program.as_os_str().to_owned()];
        argv.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(argv);
        Ok(self.reply.clone())
    }
}

/// Create `relative` (and its parents) under `root` with placeholder content
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "class Placeholder {}\n").unwrap();
    path
}

pub fn os(items: &[&str]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}
