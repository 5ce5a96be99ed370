//! Captured result of a finished process, with assertion helpers.

use crate::error::{ProcessError, captured};

/// Exit status and captured streams of a process that has terminated.
///
/// The streams are kept byte for byte. The text accessors decode them as
/// UTF-8, replacing invalid sequences with U+FFFD; use
/// [`stdout_bytes`](Self::stdout_bytes) and [`stderr_bytes`](Self::stderr_bytes)
/// for output in another encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
    raw_stdout: Vec<u8>,
    raw_stderr: Vec<u8>,
    timed_out: bool,
}

impl ProcessOutput {
    /// Create an output record. `exit_code` is `None` when the process was
    /// terminated by a signal rather than exiting normally.
    pub fn new(exit_code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        let stdout = stdout.into();
        let stderr = stderr.into();
        Self {
            exit_code,
            raw_stdout: stdout.clone().into_bytes(),
            raw_stderr: stderr.clone().into_bytes(),
            stdout,
            stderr,
            timed_out: false,
        }
    }

    /// Create an output record from the bytes a process actually wrote
    pub fn from_bytes(exit_code: Option<i32>, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            raw_stdout: stdout,
            raw_stderr: stderr,
            timed_out: false,
        }
    }

    /// Mark this output as belonging to a process that was killed after
    /// exceeding its time limit.
    pub fn into_timed_out(mut self) -> Self {
        self.timed_out = true;
        self
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn stdout_bytes(&self) -> &[u8] {
        &self.raw_stdout
    }

    pub fn stderr_bytes(&self) -> &[u8] {
        &self.raw_stderr
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Stdout followed by stderr.
    pub fn output(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len());
        combined.push_str(&self.stdout);
        combined.push_str(&self.stderr);
        combined
    }

    /// True only for a normal exit with status 0.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Human readable description of how the process terminated
    pub fn describe_status(&self) -> String {
        match (self.timed_out, self.exit_code) {
            (true, _) => "killed after timing out".to_string(),
            (false, Some(code)) => format!("exit code {}", code),
            (false, None) => "terminated by signal".to_string(),
        }
    }

    /// Verify the process exited normally with `expected`.
    pub fn should_have_exit_value(&self, expected: i32) -> Result<&Self, ProcessError> {
        if !self.timed_out && self.exit_code == Some(expected) {
            Ok(self)
        } else {
            Err(ProcessError::UnexpectedExitValue {
                expected,
                status: self.describe_status(),
                output: captured(&self.output()),
            })
        }
    }

    /// Verify that stdout or stderr contains `expected`.
    pub fn should_contain(&self, expected: &str) -> Result<&Self, ProcessError> {
        if self.stdout.contains(expected) || self.stderr.contains(expected) {
            Ok(self)
        } else {
            Err(ProcessError::MissingOutput {
                expected: expected.to_string(),
                output: captured(&self.output()),
            })
        }
    }

    /// Verify that neither stdout nor stderr contains `unexpected`.
    pub fn should_not_contain(&self, unexpected: &str) -> Result<&Self, ProcessError> {
        if self.stdout.contains(unexpected) || self.stderr.contains(unexpected) {
            Err(ProcessError::UnexpectedOutput {
                unexpected: unexpected.to_string(),
                output: captured(&self.output()),
            })
        } else {
            Ok(self)
        }
    }

    pub fn stderr_should_be_empty(&self) -> Result<&Self, ProcessError> {
        if self.stderr.is_empty() {
            Ok(self)
        } else {
            Err(ProcessError::UnexpectedStderr {
                stderr: captured(&self.stderr),
            })
        }
    }
}
