//! Builder for external tool invocations and the runner seam that executes them.
//!
//! Editors never spawn processes directly: they hand a [`ToolCommand`] to a
//! [`CommandRunner`]. [`SystemRunner`] spawns the real process; tests swap in
//! a fake that records invocations and scripts outputs.

use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default command timeout: 2 minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Poll interval while waiting for a child process.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Output captured from a tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Exit code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// A program plus arguments, executed through a [`CommandRunner`].
///
/// # Example
///
/// ```no_run
/// use episodist_av::{SystemRunner, ToolCommand};
/// use std::path::PathBuf;
///
/// let mut cmd = ToolCommand::new(PathBuf::from("mkvextract"));
/// cmd.arg("/tv/ep1.mkv").arg("tags").arg("-");
/// let output = cmd.execute(&SystemRunner::default())?;
/// println!("{}", output.stdout);
/// # Ok::<(), episodist_av::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(s.as_ref().to_os_string());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(iter.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    /// Program file name, used in error messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run through `runner`, treating any exit code outside `accepted` as failure.
    ///
    /// MKVToolNix exits with 1 when it only emitted warnings.
    pub fn execute_accepting(
        &self,
        runner: &dyn CommandRunner,
        accepted: &[i32],
    ) -> Result<ToolOutput> {
        tracing::debug!("Running {:?} {:?}", self.program, self.args);
        let output = runner.run(self)?;

        match output.code {
            Some(code) if accepted.contains(&code) => Ok(output),
            Some(code) => Err(Error::tool_failed(
                self.program_name(),
                format!("exited with status {}: {}", code, output.stderr.trim()),
            )),
            None => Err(Error::tool_failed(
                self.program_name(),
                "terminated by signal",
            )),
        }
    }

    /// Run through `runner`, requiring exit code 0.
    pub fn execute(&self, runner: &dyn CommandRunner) -> Result<ToolOutput> {
        self.execute_accepting(runner, &[0])
    }
}

/// Executes tool commands. The seam between editors and real processes.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion and capture its output.
    ///
    /// A non-zero exit is returned as output, not as an error; errors are
    /// reserved for spawn failures and timeouts.
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// Spawns real processes with `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let program_name = command.program_name();

        let mut child = Command::new(command.program())
            .args(command.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(program_name.clone())
                } else {
                    Error::tool_failed(program_name.clone(), format!("failed to spawn: {e}"))
                }
            })?;

        // Drain both pipes on their own threads so a chatty tool cannot block.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + command.get_timeout();
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::tool_failed(
                        program_name,
                        format!("timed out after {:?}", command.get_timeout()),
                    ));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        Ok(ToolOutput {
            code: status.code(),
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).to_string())
        .unwrap_or_default()
}
