//! Command-line compiler driver.
//!
//! [`CommandLineCompiler`] owns the compiler executable and its fixed
//! configuration (dialect, option-file style, spill strategy, launcher).
//! Each [`compile`](CommandLineCompiler::compile) call walks the same stages:
//!
//! ```text
//! Idle -> Translating -> ArgumentPreparation -> Launching -> Running -> Completed
//! ```
//!
//! The driver holds no mutable state, so one instance can serve many
//! threads at once. Option files are uniquely named per invocation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::builder::args::ArgStyle;
use crate::builder::dialect::Dialect;
use crate::builder::errors::CompileError;
use crate::builder::option_file::{ArgumentStrategy, OptionFile, SpillPolicy};
use crate::core::spec::CompileSpec;
use crate::util::process::{ProcessBuilder, ProcessLauncher, SystemLauncher};

/// Stage of a single compile invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Translating,
    ArgumentPreparation,
    Launching,
    Running,
    Completed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Translating => "translating",
            Stage::ArgumentPreparation => "argument-preparation",
            Stage::Launching => "launching",
            Stage::Running => "running",
            Stage::Completed => "completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the arguments reached the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Passed as process arguments
    Direct,
    /// Read from the option file at this path
    OptionFile(PathBuf),
}

/// Outcome of running the compiler on one specification.
///
/// A nonzero exit code is reported here, not as an error. When the compile
/// failed and the tokens were spilled, the result keeps the option file
/// alive for inspection; it is deleted when the result is dropped (unless
/// the driver was told to keep option files).
#[derive(Debug)]
pub struct InvocationResult {
    spec: CompileSpec,
    exit_code: Option<i32>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    transport: Transport,
    option_file: Option<OptionFile>,
}

impl InvocationResult {
    /// The specification that produced this result.
    pub fn spec(&self) -> &CompileSpec {
        &self.spec
    }

    /// Exit code, or `None` if the compiler was killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Captured standard output, verbatim.
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Captured standard error, verbatim.
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Option file retained after a failed compile.
    pub fn option_file(&self) -> Option<&OptionFile> {
        self.option_file.as_ref()
    }

    /// Turn a failed compilation into [`CompileError::CompilationFailed`].
    pub fn check(self) -> Result<Self, CompileError> {
        if self.success() {
            return Ok(self);
        }
        Err(CompileError::CompilationFailed {
            label: self.spec.label(),
            sources: self.spec.sources().to_vec(),
            exit_code: self.exit_code,
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

/// Drives an external command-line compiler.
#[derive(Clone)]
pub struct CommandLineCompiler {
    executable: PathBuf,
    dialect: Dialect,
    strategy: ArgumentStrategy,
    launcher: Arc<dyn ProcessLauncher>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
    timeout: Option<Duration>,
    keep_option_files: bool,
}

impl fmt::Debug for CommandLineCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLineCompiler")
            .field("executable", &self.executable)
            .field("dialect", &self.dialect)
            .field("strategy", &self.strategy)
            .field("cwd", &self.cwd)
            .field("env", &self.env)
            .field("timeout", &self.timeout)
            .field("keep_option_files", &self.keep_option_files)
            .finish_non_exhaustive()
    }
}

impl CommandLineCompiler {
    /// Create a driver for `executable` using `dialect` and option-file `style`.
    pub fn new(executable: impl Into<PathBuf>, dialect: Dialect, style: ArgStyle) -> Self {
        CommandLineCompiler {
            executable: executable.into(),
            dialect,
            strategy: ArgumentStrategy::new(style),
            launcher: Arc::new(SystemLauncher),
            cwd: None,
            env: Vec::new(),
            timeout: None,
            keep_option_files: false,
        }
    }

    /// Create a driver with the dialect's own option-file style.
    pub fn for_dialect(executable: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self::new(executable, dialect, dialect.default_style())
    }

    /// Replace the process launcher.
    pub fn launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Set the spill threshold.
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.strategy = self.strategy.threshold(threshold);
        self
    }

    pub fn spill_policy(mut self, policy: SpillPolicy) -> Self {
        self.strategy = self.strategy.policy(policy);
        self
    }

    /// Directory for option files.
    pub fn option_file_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.strategy = self.strategy.dir(dir);
        self
    }

    /// Keep option files on disk after failed compiles.
    pub fn keep_option_files(mut self, keep: bool) -> Self {
        self.keep_option_files = keep;
        self
    }

    /// Working directory of the compiler process.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Add an environment variable for the compiler process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Timeout handed to the launcher.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn style(&self) -> ArgStyle {
        self.strategy.style()
    }

    pub fn strategy(&self) -> &ArgumentStrategy {
        &self.strategy
    }

    /// Translate a specification without running anything.
    pub fn arguments(&self, spec: &CompileSpec) -> Result<Vec<String>, CompileError> {
        Ok(self.dialect.translate(spec)?)
    }

    /// Compile one specification.
    ///
    /// Returns `Ok` whenever the compiler ran, including when it reported
    /// errors; use [`InvocationResult::check`] to treat those as errors.
    pub fn compile(&self, spec: &CompileSpec) -> Result<InvocationResult, CompileError> {
        let label = spec.label();
        self.enter(Stage::Idle, &label);
        self.enter(Stage::Translating, &label);
        let tokens = self.dialect.translate(spec)?;

        self.enter(Stage::ArgumentPreparation, &label);
        let prepared = self.strategy.prepare(&tokens, self.dialect)?;
        let transport = match &prepared.option_file {
            Some(file) => Transport::OptionFile(file.path().to_path_buf()),
            None => Transport::Direct,
        };

        self.enter(Stage::Launching, &label);
        let process = self.process(prepared.args);
        tracing::debug!("running {}", process.display_command());

        self.enter(Stage::Running, &label);
        // An option file from a failed launch is dropped, and deleted, here
        let output = self
            .launcher
            .launch(&process)
            .map_err(|source| CompileError::Invocation {
                program: self.executable.clone(),
                source,
            })?;

        self.enter(Stage::Completed, &label);
        let option_file = if output.success() {
            if let Some(file) = prepared.option_file {
                if let Err(e) = file.delete() {
                    tracing::warn!("failed to remove option file: {}", e);
                }
            }
            None
        } else {
            tracing::debug!(
                "{} failed with exit code {:?}",
                label,
                output.exit_code
            );
            self.retain(prepared.option_file)
        };

        Ok(InvocationResult {
            spec: spec.clone(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            transport,
            option_file,
        })
    }

    fn process(&self, args: Vec<String>) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.executable)
            .args(args)
            .timeout(self.timeout);

        for (key, value) in &self.env {
            cmd = cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd = cmd.cwd(cwd);
        }

        cmd
    }

    fn retain(&self, file: Option<OptionFile>) -> Option<OptionFile> {
        let file = file?;
        if !self.keep_option_files {
            return Some(file);
        }
        match file.persist() {
            Ok(path) => tracing::info!("kept option file {}", path.display()),
            Err(e) => tracing::warn!("failed to keep option file: {}", e),
        }
        None
    }

    fn enter(&self, stage: Stage, label: &str) {
        tracing::debug!(stage = stage.as_str(), "{}", label);
    }
}
