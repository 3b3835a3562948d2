//! Compile error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::builder::option_file::OptionFileError;
use crate::core::spec::SpecError;
use crate::util::diagnostic::Diagnostic;
use crate::util::process::LaunchError;

/// Everything that can go wrong while compiling one specification.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid compile specification: {0}")]
    InvalidSpecification(#[from] SpecError),

    #[error(transparent)]
    OptionFile(#[from] OptionFileError),

    #[error("could not run compiler `{}`", .program.display())]
    Invocation {
        program: PathBuf,
        #[source]
        source: LaunchError,
    },

    #[error("compilation failed for {label} ({})", describe_exit(.exit_code))]
    CompilationFailed {
        /// Short description of the failing unit
        label: String,
        /// Source files of the failing unit
        sources: Vec<PathBuf>,
        exit_code: Option<i32>,
        /// Compiler stdout, verbatim
        stdout: Vec<u8>,
        /// Compiler stderr, verbatim
        stderr: Vec<u8>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl CompileError {
    /// Whether this error should abort the enclosing build step.
    ///
    /// A failed compilation is an ordinary outcome that can be collected
    /// alongside other units; every other variant points at the environment
    /// or the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CompileError::CompilationFailed { .. })
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::InvalidSpecification(err) => {
                let mut diag = Diagnostic::error(format!("invalid compile specification: {}", err));
                diag = match err {
                    SpecError::NoSources => {
                        diag.with_suggestion("Add at least one source file".to_string())
                    }
                    SpecError::InvalidMacroName { name } => diag.with_suggestion(format!(
                        "Pass the value separately instead of `{}`",
                        name
                    )),
                    SpecError::OutputFileWithMultipleSources { .. }
                    | SpecError::OutputDirectoryUnsupported { .. } => diag.with_suggestion(
                        "Compile each source as its own unit".to_string(),
                    ),
                    SpecError::NonUtf8Path { .. } => diag.with_suggestion(
                        "Rename the file or directory using UTF-8 characters".to_string(),
                    ),
                    SpecError::EmptyPath { .. } => diag,
                };
                diag
            }

            CompileError::OptionFile(err) => {
                let mut diag = Diagnostic::error(err.to_string())
                    .with_context(format!("cause: {}", err.io_error()));
                if let Some(path) = err.path() {
                    diag = diag.with_location(path);
                }
                diag.with_suggestion("Check free disk space and permissions of the option file directory".to_string())
            }

            CompileError::Invocation { program, source } => {
                let mut diag = Diagnostic::error(format!(
                    "could not run compiler `{}`",
                    program.display()
                ))
                .with_context(source.to_string());

                if let LaunchError::Spawn { source, .. } | LaunchError::Wait { source, .. } = source
                {
                    diag = diag.with_context(format!("cause: {}", source));
                }

                diag.with_suggestion("Check that the compiler path exists and is executable".to_string())
            }

            CompileError::CompilationFailed {
                label,
                exit_code,
                stdout,
                stderr,
                ..
            } => {
                let diag = Diagnostic::error(format!("compilation failed for {}", label));
                let diag = match exit_code {
                    Some(code) => diag.with_context(format!("compiler exited with code {}", code)),
                    None => diag.with_context("compiler was terminated by a signal".to_string()),
                };
                let mut captured = String::from_utf8_lossy(stdout).into_owned();
                captured.push_str(&String::from_utf8_lossy(stderr));
                diag.with_output(captured)
            }
        }
    }
}
