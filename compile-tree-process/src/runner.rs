//! Running external programs to completion
//!
//! The [`ProcessRunner`] trait is the seam between code that needs to run a
//! program and the operating system. [`SystemProcessRunner`] is the real
//! implementation: it captures both output streams in full while forwarding
//! them live to this process's own stdout and stderr, so a person watching
//! the run sees diagnostics as they are produced.

use crate::error::ProcessError;
use crate::output::ProcessOutput;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Runs a program with arguments and reports how it terminated
pub trait ProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput, ProcessError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput, ProcessError> {
        (**self).run(program, args)
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for Box<R> {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput, ProcessError> {
        (**self).run(program, args)
    }
}

/// Spawns real OS processes and blocks until they exit.
#[derive(Debug, Clone)]
pub struct SystemProcessRunner {
    forward: bool,
    timeout: Option<Duration>,
}

impl Default for SystemProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProcessRunner {
    /// Runner that forwards output and waits without a time limit
    pub fn new() -> Self {
        Self {
            forward: true,
            timeout: None,
        }
    }

    /// Capture output without echoing it to this process's streams
    pub fn quiet(mut self) -> Self {
        self.forward = false;
        self
    }

    /// Kill the child once it has run for longer than `timeout`.
    ///
    /// On Unix the child then runs in its own process group and the whole
    /// group is killed, so processes it started cannot keep the output pipes
    /// open past the deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn forwards_output(&self) -> bool {
        self.forward
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.timeout
    }

    /// Wait for the child, enforcing `deadline` if one is set.
    /// Returns the exit status and whether the child had to be killed.
    fn wait(&self, child: &mut Child, deadline: Option<Instant>) -> io::Result<(ExitStatus, bool)> {
        let Some(deadline) = deadline else {
            return child.wait().map(|status| (status, false));
        };

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok((status, false));
            }
            if Instant::now() >= deadline {
                warn!(pid = child.id(), "process exceeded its time limit, killing it");
                if let Err(err) = kill_process_tree(child) {
                    debug!("kill failed, process probably exited already: {}", err);
                }
                return child.wait().map(|status| (status, true));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ProcessOutput, ProcessError> {
        info!(command = %render_command_line(program, args), "running process");
        let started = Instant::now();

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Only a time-limited child leaves our process group; otherwise it
        // keeps receiving terminal signals such as Ctrl-C along with us.
        #[cfg(unix)]
        if self.timeout.is_some() {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        let child_stdout = child.stdout.take().ok_or_else(|| {
            ProcessError::io("capturing stdout", io::Error::other("stdout was not piped"))
        })?;
        let child_stderr = child.stderr.take().ok_or_else(|| {
            ProcessError::io("capturing stderr", io::Error::other("stderr was not piped"))
        })?;
        let forward = self.forward;
        let deadline = self.timeout.map(|timeout| started + timeout);

        let (waited, stdout, stderr) = thread::scope(|scope| {
            let stdout_reader = scope.spawn(move || pump(child_stdout, forward.then(io::stdout)));
            let stderr_reader = scope.spawn(move || pump(child_stderr, forward.then(io::stderr)));
            #[cfg_attr(not(unix), allow(unused_mut))]
            let mut waited = self.wait(&mut child, deadline);

            // Processes the child left behind may still hold the pipes open
            #[cfg(unix)]
            if let Some(deadline) = deadline {
                while !(stdout_reader.is_finished() && stderr_reader.is_finished()) {
                    if Instant::now() >= deadline {
                        warn!(pid = child.id(), "output still open past the time limit, killing process group");
                        if let Err(err) = kill_process_group(child.id()) {
                            debug!("kill failed, process group probably exited already: {}", err);
                        }
                        if let Ok((_, timed_out)) = waited.as_mut() {
                            *timed_out = true;
                        }
                        break;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }

            (
                waited,
                join_reader(stdout_reader.join()),
                join_reader(stderr_reader.join()),
            )
        });

        let (status, timed_out) = waited.map_err(|source| ProcessError::io("waiting for process", source))?;
        let stdout = stdout.map_err(|source| ProcessError::io("reading stdout", source))?;
        let stderr = stderr.map_err(|source| ProcessError::io("reading stderr", source))?;

        let mut output = ProcessOutput::from_bytes(status.code(), stdout, stderr);
        if timed_out {
            output = output.into_timed_out();
        }

        info!(
            status = %output.describe_status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "process finished"
        );
        Ok(output)
    }
}

/// Kill the child together with everything in its process group.
#[cfg(unix)]
fn kill_process_tree(child: &mut Child) -> io::Result<()> {
    kill_process_group(child.id())
}

/// The group id equals the pid of its leader, which was spawned with
/// `process_group(0)`. The group outlives its leader while members remain.
#[cfg(unix)]
fn kill_process_group(leader: u32) -> io::Result<()> {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    killpg(Pid::from_raw(leader as i32), Signal::SIGKILL).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn kill_process_tree(child: &mut Child) -> io::Result<()> {
    child.kill()
}

/// Copy everything from `source` into a buffer, echoing each chunk to `sink`.
/// A sink that stops accepting writes is dropped; capture carries on.
pub(crate) fn pump<R: Read, W: Write>(mut source: R, mut sink: Option<W>) -> io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        let chunk = &buffer[..read];
        captured.extend_from_slice(chunk);
        if let Some(writer) = sink.as_mut() {
            if let Err(err) = writer.write_all(chunk).and_then(|_| writer.flush()) {
                debug!("stopped forwarding process output: {}", err);
                sink = None;
            }
        }
    }
    Ok(captured)
}

fn join_reader(
    joined: thread::Result<io::Result<Vec<u8>>>,
) -> io::Result<Vec<u8>> {
    joined.unwrap_or_else(|_| Err(io::Error::other("output reader thread panicked")))
}

/// Render a program and its arguments as a copy-pasteable shell command line.
pub fn render_command_line(program: &Path, args: &[OsString]) -> String {
    let mut line = quote(&program.to_string_lossy());
    for arg in args {
        line.push(' ');
        line.push_str(&quote(&arg.to_string_lossy()));
    }
    line
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
