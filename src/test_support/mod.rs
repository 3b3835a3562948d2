//! Test utilities and mocks for ccinvoke unit tests.
//!
//! This module provides a recording [`MockLauncher`] that stands in for
//! real process execution, plus fixtures for stub compilers.
//!
//! # Example
//!
//! ```rust,ignore
//! use ccinvoke::test_support::{MockLauncher, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let launcher = Arc::new(MockLauncher::with_output(MockProcessOutput::failure(1, "error")));
//!     let compiler = CommandLineCompiler::for_dialect("g++", Dialect::Gcc).launcher(launcher.clone());
//!     // compile, then inspect launcher.calls()...
//! }
//! ```

pub mod fixtures;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::util::process::{LaunchError, ProcessBuilder, ProcessLauncher, ProcessOutput};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    fn to_process_output(&self) -> ProcessOutput {
        ProcessOutput {
            exit_code: Some(self.status),
            stdout: self.stdout.clone().into_bytes(),
            stderr: self.stderr.clone().into_bytes(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// One launch observed by [`MockLauncher`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
    /// Contents of the `@file` argument, read at launch time
    pub option_file: Option<String>,
}

#[derive(Debug, Clone)]
enum Behavior {
    Output(MockProcessOutput),
    SpawnFailure,
}

/// Mock process launcher for testing the driver.
///
/// Records every launch and answers with a fixed output. Option files are
/// deleted after the driver finishes, so their contents are captured while
/// the "process" runs.
#[derive(Debug)]
pub struct MockLauncher {
    behavior: Behavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLauncher {
    /// A launcher whose processes always succeed silently.
    pub fn new() -> Self {
        Self::with_output(MockProcessOutput::default())
    }

    /// A launcher whose processes always produce `output`.
    pub fn with_output(output: MockProcessOutput) -> Self {
        MockLauncher {
            behavior: Behavior::Output(output),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A launcher that behaves like a missing executable.
    pub fn spawn_failure() -> Self {
        MockLauncher {
            behavior: Behavior::SpawnFailure,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Get all launches so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessLauncher for MockLauncher {
    fn launch(&self, process: &ProcessBuilder) -> Result<ProcessOutput, LaunchError> {
        let option_file = process
            .get_args()
            .iter()
            .find_map(|a| a.strip_prefix('@'))
            .and_then(|path| std::fs::read_to_string(Path::new(path)).ok());

        let call = RecordedCall {
            program: process.get_program().to_path_buf(),
            args: process.get_args().to_vec(),
            env: process.get_envs().clone(),
            cwd: process.get_cwd().map(Path::to_path_buf),
            timeout: process.get_timeout(),
            option_file,
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }

        match &self.behavior {
            Behavior::Output(output) => Ok(output.to_process_output()),
            Behavior::SpawnFailure => Err(LaunchError::Spawn {
                program: process.get_program().to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "program not found"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_launcher_records_calls() {
        let launcher = MockLauncher::with_output(MockProcessOutput::failure(3, "bad"));
        let process = ProcessBuilder::new("cc").args(["-c", "x.c"]).cwd("/tmp");

        let output = launcher.launch(&process).unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stderr, b"bad");

        let calls = launcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, ["-c", "x.c"]);
        assert_eq!(calls[0].cwd.as_deref(), Some(Path::new("/tmp")));
        assert!(calls[0].option_file.is_none());
    }

    #[test]
    fn test_mock_launcher_reads_option_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("args.rsp");
        std::fs::write(&file, "-c\nx.c\n").unwrap();

        let launcher = MockLauncher::new();
        let process = ProcessBuilder::new("cc").arg(format!("@{}", file.display()));
        launcher.launch(&process).unwrap();

        assert_eq!(launcher.calls()[0].option_file.as_deref(), Some("-c\nx.c\n"));
    }

    #[test]
    fn test_spawn_failure() {
        let launcher = MockLauncher::spawn_failure();
        let err = launcher.launch(&ProcessBuilder::new("cc")).unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }
}
