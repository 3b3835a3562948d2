//! Overflow-safe argument passing.
//!
//! Long command lines are spilled into an option file and replaced by a
//! single `@file` reference. Spilling only changes how the tokens travel to
//! the compiler, never which tokens it sees.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempPath;
use thiserror::Error;

use crate::builder::args::{command_line_length, ArgStyle};
use crate::builder::dialect::Dialect;

/// Conservative limit for Windows hosts (`cmd.exe` stops at 8191 characters).
pub const DEFAULT_WINDOWS_THRESHOLD: usize = 8000;

/// Conservative limit for POSIX hosts (Linux caps a single argument at 128 KiB).
pub const DEFAULT_POSIX_THRESHOLD: usize = 100_000;

/// Default spill threshold for the host platform.
pub fn default_threshold() -> usize {
    if cfg!(windows) {
        DEFAULT_WINDOWS_THRESHOLD
    } else {
        DEFAULT_POSIX_THRESHOLD
    }
}

/// When to spill arguments into an option file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpillPolicy {
    /// Spill once the command line reaches the threshold
    #[default]
    Auto,
    /// Always use an option file
    Always,
    /// Never use an option file
    Never,
}

impl std::str::FromStr for SpillPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SpillPolicy::Auto),
            "always" => Ok(SpillPolicy::Always),
            "never" => Ok(SpillPolicy::Never),
            _ => Err(format!(
                "invalid spill policy '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Failure to create or fill an option file.
#[derive(Debug, Error)]
pub enum OptionFileError {
    #[error("failed to create option file")]
    Create {
        #[source]
        source: io::Error,
    },

    #[error("failed to write option file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OptionFileError {
    /// Path of the file, if it was created before the failure.
    pub fn path(&self) -> Option<&Path> {
        match self {
            OptionFileError::Create { .. } => None,
            OptionFileError::Write { path, .. } => Some(path),
        }
    }

    /// The underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            OptionFileError::Create { source } | OptionFileError::Write { source, .. } => source,
        }
    }
}

/// An option file owned by a single invocation.
///
/// The file is deleted when this value is dropped, unless [`persist`] is
/// called first.
///
/// [`persist`]: OptionFile::persist
#[derive(Debug)]
pub struct OptionFile {
    path: TempPath,
}

impl OptionFile {
    /// Create a uniquely named option file holding `contents`.
    pub fn create(dir: Option<&Path>, contents: &str) -> Result<Self, OptionFileError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ccinvoke-").suffix(".rsp");

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|source| OptionFileError::Create { source })?;

        let path = file.path().to_path_buf();
        file.write_all(contents.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| OptionFileError::Write { path, source })?;

        // Close the handle so the compiler can open the file on every platform
        Ok(OptionFile {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file back.
    pub fn contents(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    /// Keep the file on disk and return its path.
    pub fn persist(self) -> io::Result<PathBuf> {
        self.path.keep().map_err(|e| e.error)
    }

    /// Delete the file now, reporting failures instead of ignoring them.
    pub fn delete(self) -> io::Result<()> {
        self.path.close()
    }
}

/// Process arguments ready for launch.
#[derive(Debug)]
pub struct PreparedArgs {
    /// Arguments to pass to the process
    pub args: Vec<String>,
    /// Option file referenced by `args`, if the tokens were spilled
    pub option_file: Option<OptionFile>,
}

impl PreparedArgs {
    pub fn is_spilled(&self) -> bool {
        self.option_file.is_some()
    }
}

/// Decides between direct arguments and an option file.
#[derive(Debug, Clone)]
pub struct ArgumentStrategy {
    style: ArgStyle,
    threshold: usize,
    policy: SpillPolicy,
    dir: Option<PathBuf>,
}

impl ArgumentStrategy {
    /// Create a strategy with the host's default threshold.
    pub fn new(style: ArgStyle) -> Self {
        ArgumentStrategy {
            style,
            threshold: default_threshold(),
            policy: SpillPolicy::Auto,
            dir: None,
        }
    }

    /// Set the command-line length at which tokens are spilled.
    pub fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn policy(mut self, policy: SpillPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create option files in `dir` instead of the system temp directory.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn style(&self) -> ArgStyle {
        self.style
    }

    pub fn get_threshold(&self) -> usize {
        self.threshold
    }

    pub fn get_policy(&self) -> SpillPolicy {
        self.policy
    }

    /// Whether these tokens would be spilled.
    pub fn should_spill(&self, tokens: &[String]) -> bool {
        match self.policy {
            SpillPolicy::Always => true,
            SpillPolicy::Never => false,
            SpillPolicy::Auto => command_line_length(tokens) >= self.threshold,
        }
    }

    /// Produce the final process arguments for `tokens`.
    pub fn prepare(
        &self,
        tokens: &[String],
        dialect: Dialect,
    ) -> Result<PreparedArgs, OptionFileError> {
        if !self.should_spill(tokens) {
            return Ok(PreparedArgs {
                args: self.style.render_args(tokens),
                option_file: None,
            });
        }

        let contents = self.style.render_file(tokens);
        let file = OptionFile::create(self.dir.as_deref(), &contents)?;

        tracing::debug!(
            "spilled {} arguments ({} bytes) to {}",
            tokens.len(),
            command_line_length(tokens),
            file.path().display()
        );

        Ok(PreparedArgs {
            args: vec![dialect.option_file_reference(file.path())],
            option_file: Some(file),
        })
    }
}
