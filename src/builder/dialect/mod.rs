//! Argument dialects for command-line compilers.
//!
//! A [`Dialect`] turns a [`CompileSpec`] into the ordered argument tokens a
//! particular compiler family understands. Translation is pure: no I/O, no
//! environment lookups, and the same spec always yields the same tokens.
//!
//! The family is chosen once when a driver is constructed:
//! - [`Dialect::Msvc`]: `cl.exe` and compatible (`clang-cl`)
//! - [`Dialect::Gcc`]: `gcc`/`g++`
//! - [`Dialect::Clang`]: `clang`/`clang++`

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::args::ArgStyle;
use crate::core::spec::{CompileSpec, SpecError};

mod gcc;
mod msvc;

/// Compiler family whose flag spelling is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Microsoft Visual C++
    Msvc,
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
}

impl Dialect {
    /// Get the dialect name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Msvc => "msvc",
            Dialect::Gcc => "gcc",
            Dialect::Clang => "clang",
        }
    }

    /// The dialect of the usual system compiler on this host.
    pub fn host_default() -> Self {
        if cfg!(windows) {
            Dialect::Msvc
        } else {
            Dialect::Gcc
        }
    }

    /// Option-file syntax this family's compiler reads.
    ///
    /// `cl.exe` parses command files with Windows rules; GCC and Clang use
    /// GNU rules for `@file` on every platform.
    pub fn default_style(&self) -> ArgStyle {
        match self {
            Dialect::Msvc => ArgStyle::Windows,
            Dialect::Gcc | Dialect::Clang => ArgStyle::Posix,
        }
    }

    /// Object file extension produced by this family.
    pub fn object_extension(&self) -> &'static str {
        match self {
            Dialect::Msvc => "obj",
            Dialect::Gcc | Dialect::Clang => "o",
        }
    }

    /// Object file this family writes for `source` when told to use `dir`.
    pub fn object_path(&self, dir: &Path, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        dir.join(format!("{}.{}", stem, self.object_extension()))
    }

    /// Translate a specification into argument tokens.
    pub fn translate(&self, spec: &CompileSpec) -> Result<Vec<String>, SpecError> {
        spec.validate()?;
        let tokens = match self {
            Dialect::Msvc => msvc::translate(spec),
            Dialect::Gcc | Dialect::Clang => gcc::translate(spec, *self)?,
        };
        Ok(tokens.into_tokens())
    }

    /// The single token that tells the compiler to read arguments from `path`.
    pub fn option_file_reference(&self, path: &Path) -> String {
        // Both cl.exe and the GNU drivers use `@file`.
        format!("@{}", path.display())
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "msvc" | "cl" | "visualcpp" => Ok(Dialect::Msvc),
            "gcc" | "gnu" | "g++" => Ok(Dialect::Gcc),
            "clang" | "llvm" | "clang++" => Ok(Dialect::Clang),
            _ => Err(format!(
                "unknown dialect '{}'; expected 'msvc', 'gcc', or 'clang'",
                s
            )),
        }
    }
}

/// Ordered token accumulator shared by the translators.
#[derive(Debug, Default)]
struct ArgCollector {
    tokens: Vec<String>,
}

impl ArgCollector {
    fn new() -> Self {
        ArgCollector::default()
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.tokens.push(arg.into());
        self
    }

    fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tokens.extend(args.into_iter().map(Into::into));
        self
    }

    // Paths are checked as UTF-8 before translation, so this is lossless
    fn path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}
