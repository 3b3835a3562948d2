//! Compile specification: the description of one compilation unit.
//!
//! A [`CompileSpec`] is purely descriptive. It says what to compile and with
//! which include paths, macros and flags, without knowing anything about the
//! compiler family that will eventually receive it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source language override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    #[serde(alias = "c++", alias = "cpp")]
    Cxx,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" => Ok(Language::C),
            "c++" | "cxx" | "cpp" => Ok(Language::Cxx),
            _ => Err(format!("unknown language '{}'; expected 'c' or 'c++'", s)),
        }
    }
}

/// Where compiled output goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// A single output file (only valid for one source).
    File(PathBuf),
    /// A directory receiving one object per source.
    Directory(PathBuf),
}

impl Output {
    /// Get the output path.
    pub fn path(&self) -> &Path {
        match self {
            Output::File(p) | Output::Directory(p) => p,
        }
    }
}

/// Structural problems with a compile specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("no source files to compile")]
    NoSources,

    #[error("empty path in {field}")]
    EmptyPath { field: &'static str },

    #[error("path in {field} is not valid UTF-8: {}", .path.display())]
    NonUtf8Path { field: &'static str, path: PathBuf },

    #[error("invalid macro name `{name}`")]
    InvalidMacroName { name: String },

    #[error("a single output file cannot receive {count} sources")]
    OutputFileWithMultipleSources { count: usize },

    #[error("{dialect} cannot place {count} objects into an output directory")]
    OutputDirectoryUnsupported { dialect: &'static str, count: usize },
}

/// Description of one compilation unit.
///
/// Immutable once built. Ordering of every list is significant and is
/// preserved by all dialect translators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompileSpec {
    /// Source files (ordered, non-empty)
    sources: Vec<PathBuf>,
    /// Output file or directory
    output: Option<Output>,
    /// Include directories, in search order
    include_dirs: Vec<PathBuf>,
    /// Preprocessor defines (name, optional value)
    defines: Vec<(String, Option<String>)>,
    /// Extra flags passed through verbatim
    args: Vec<String>,
    /// Target architecture / ABI tag
    target: Option<String>,
    /// Forced source language
    language: Option<Language>,
    /// Stop after producing objects
    compile_only: bool,
    /// Generate position independent code
    position_independent: bool,
}

impl CompileSpec {
    /// Start building a specification for the given sources.
    pub fn builder<I, P>(sources: I) -> CompileSpecBuilder
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        CompileSpecBuilder {
            spec: CompileSpec {
                sources: sources.into_iter().map(Into::into).collect(),
                ..CompileSpec::default()
            },
        }
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn output(&self) -> Option<&Output> {
        self.output.as_ref()
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn defines(&self) -> &[(String, Option<String>)] {
        &self.defines
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn compile_only(&self) -> bool {
        self.compile_only
    }

    pub fn position_independent(&self) -> bool {
        self.position_independent
    }

    /// Check the family-independent structure of the specification.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.sources.is_empty() {
            return Err(SpecError::NoSources);
        }

        for source in &self.sources {
            check_path(source, "sources")?;
        }

        for dir in &self.include_dirs {
            check_path(dir, "include_dirs")?;
        }

        if let Some(output) = &self.output {
            check_path(output.path(), "output")?;
            if matches!(output, Output::File(_)) && self.sources.len() > 1 {
                return Err(SpecError::OutputFileWithMultipleSources {
                    count: self.sources.len(),
                });
            }
        }

        for (name, _) in &self.defines {
            if !is_valid_macro_name(name) {
                return Err(SpecError::InvalidMacroName { name: name.clone() });
            }
        }

        Ok(())
    }

    /// Short human-readable label for logs and diagnostics.
    pub fn label(&self) -> String {
        match self.sources.as_slice() {
            [] => "<no sources>".to_string(),
            [one] => one.display().to_string(),
            [first, rest @ ..] => format!("{} (+{} more)", first.display(), rest.len()),
        }
    }
}

/// Command lines are text, so every path must be non-empty and valid UTF-8.
fn check_path(path: &Path, field: &'static str) -> Result<(), SpecError> {
    if path.as_os_str().is_empty() {
        return Err(SpecError::EmptyPath { field });
    }
    if path.to_str().is_none() {
        return Err(SpecError::NonUtf8Path {
            field,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn is_valid_macro_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('=') && !name.chars().any(char::is_whitespace)
}

/// Builder for [`CompileSpec`].
#[derive(Debug, Clone)]
pub struct CompileSpecBuilder {
    spec: CompileSpec,
}

impl CompileSpecBuilder {
    /// Add another source file.
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.sources.push(path.into());
        self
    }

    /// Write the object to this file.
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.output = Some(Output::File(path.into()));
        self
    }

    /// Write objects into this directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.output = Some(Output::Directory(path.into()));
        self
    }

    /// Add an include directory.
    pub fn include_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec.include_dirs.push(path.into());
        self
    }

    /// Add multiple include directories.
    pub fn include_dirs<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.spec
            .include_dirs
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add a macro definition with an optional value.
    pub fn define(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.spec
            .defines
            .push((name.into(), value.map(str::to_string)));
        self
    }

    /// Add a macro from `NAME` or `NAME=VALUE` form.
    pub fn define_flag(self, flag: &str) -> Self {
        match flag.split_once('=') {
            Some((name, value)) => self.define(name, Some(value)),
            None => self.define(flag, None),
        }
    }

    /// Add a raw compiler flag.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.spec.args.push(arg.into());
        self
    }

    /// Add multiple raw compiler flags.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.spec.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the target architecture / ABI tag.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.spec.target = Some(target.into());
        self
    }

    /// Force the source language.
    pub fn language(mut self, language: Language) -> Self {
        self.spec.language = Some(language);
        self
    }

    pub fn compile_only(mut self, yes: bool) -> Self {
        self.spec.compile_only = yes;
        self
    }

    pub fn position_independent(mut self, yes: bool) -> Self {
        self.spec.position_independent = yes;
        self
    }

    /// Validate and finish the specification.
    pub fn build(self) -> Result<CompileSpec, SpecError> {
        self.spec.validate()?;
        Ok(self.spec)
    }

    /// Finish without validating.
    ///
    /// Translators validate again, so an invalid spec built this way is
    /// rejected at compile time instead.
    pub fn build_unchecked(self) -> CompileSpec {
        self.spec
    }
}
