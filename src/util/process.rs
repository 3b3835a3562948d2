//! Subprocess execution utilities.
//!
//! [`ProcessLauncher`] is the seam between the compiler driver and the
//! operating system. [`SystemLauncher`] runs real processes; tests swap in a
//! recording mock.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// How often a child is polled while a timeout is pending.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Failure to run a process to completion.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn `{}`", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{}`", .program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` timed out after {:.1}s", .program.display(), .timeout.as_secs_f64())]
    TimedOut { program: PathBuf, timeout: Duration },
}

/// Exit status and captured streams of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code, or `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Kill the process if it runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the environment overrides.
    pub fn get_envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Get the working directory.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion, capturing output.
    pub fn exec(&self) -> Result<ProcessOutput, LaunchError> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        // Drain both pipes concurrently so a chatty compiler never blocks
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(limit) => self.wait_with_timeout(&mut child, limit),
            None => child.wait().map_err(|source| LaunchError::Wait {
                program: self.program.clone(),
                source,
            }),
        };

        // Return before joining: after a timeout, grandchildren may still
        // hold the pipes open
        let status = status?;
        let stdout = self.collect(stdout)?;
        let stderr = self.collect(stderr)?;

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }

    fn collect(&self, drained: thread::JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>, LaunchError> {
        let read = drained
            .join()
            .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "output reader panicked")));
        read.map_err(|source| LaunchError::Wait {
            program: self.program.clone(),
            source,
        })
    }

    fn wait_with_timeout(&self, child: &mut Child, limit: Duration) -> Result<ExitStatus, LaunchError> {
        let deadline = Instant::now() + limit;
        loop {
            let polled = child.try_wait().map_err(|source| LaunchError::Wait {
                program: self.program.clone(),
                source,
            })?;
            if let Some(status) = polled {
                return Ok(status);
            }

            if Instant::now() >= deadline {
                if let Err(e) = child.kill() {
                    tracing::warn!("failed to kill `{}`: {}", self.program.display(), e);
                }
                // Reap the child so it does not linger as a zombie
                let _ = child.wait();
                return Err(LaunchError::TimedOut {
                    program: self.program.clone(),
                    timeout: limit,
                });
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

/// Runs a fully configured process and returns its captured output.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, process: &ProcessBuilder) -> Result<ProcessOutput, LaunchError>;
}

/// Launches real operating-system processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, process: &ProcessBuilder) -> Result<ProcessOutput, LaunchError> {
        process.exec()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
