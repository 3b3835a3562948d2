//! Configuration file support for ccinvoke.
//!
//! Two configuration file locations are read:
//! - Global: `~/.ccinvoke/config.toml` - User-wide defaults
//! - Project: `.ccinvoke/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::args::ArgStyle;
use crate::builder::dialect::Dialect;
use crate::builder::driver::CommandLineCompiler;
use crate::builder::option_file::SpillPolicy;
use crate::util::process::find_executable;

/// ccinvoke configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which compiler to run and how it reads arguments
    pub compiler: CompilerConfig,

    /// How arguments reach the compiler
    pub invocation: InvocationConfig,
}

/// Compiler selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Path to the compiler (e.g., /usr/bin/g++)
    pub executable: Option<PathBuf>,

    /// Flag spelling (msvc, gcc, clang)
    pub dialect: Option<Dialect>,

    /// Option-file syntax (windows, posix); follows the dialect when unset
    pub style: Option<ArgStyle>,
}

/// Argument passing and process settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvocationConfig {
    /// Command-line length at which arguments move to an option file
    pub spill_threshold: Option<usize>,

    /// Spill policy (auto, always, never)
    pub spill: Option<SpillPolicy>,

    /// Directory for option files (None = system temp dir)
    pub option_file_dir: Option<PathBuf>,

    /// Keep option files of failed compilations
    #[serde(default)]
    pub keep_option_files: bool,

    /// Kill the compiler after this many seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.compiler.executable.is_some() {
            self.compiler.executable = other.compiler.executable;
        }
        if other.compiler.dialect.is_some() {
            self.compiler.dialect = other.compiler.dialect;
        }
        if other.compiler.style.is_some() {
            self.compiler.style = other.compiler.style;
        }

        if other.invocation.spill_threshold.is_some() {
            self.invocation.spill_threshold = other.invocation.spill_threshold;
        }
        if other.invocation.spill.is_some() {
            self.invocation.spill = other.invocation.spill;
        }
        if other.invocation.option_file_dir.is_some() {
            self.invocation.option_file_dir = other.invocation.option_file_dir;
        }
        if other.invocation.keep_option_files {
            self.invocation.keep_option_files = true;
        }
        if other.invocation.timeout_secs.is_some() {
            self.invocation.timeout_secs = other.invocation.timeout_secs;
        }
    }

    /// Build a compiler driver from this configuration.
    pub fn driver(&self) -> CommandLineCompiler {
        self.invocation.apply(self.compiler.apply())
    }
}

impl CompilerConfig {
    /// Dialect in effect: configured, inferred from the executable name, or
    /// the host default.
    pub fn effective_dialect(&self) -> Dialect {
        self.dialect
            .or_else(|| self.executable.as_deref().and_then(infer_dialect))
            .unwrap_or_else(Dialect::host_default)
    }

    /// Build a driver with this compiler selection.
    pub fn apply(&self) -> CommandLineCompiler {
        let dialect = self.effective_dialect();
        let executable = self
            .executable
            .clone()
            .unwrap_or_else(|| default_executable(dialect));
        let style = self.style.unwrap_or_else(|| dialect.default_style());
        CommandLineCompiler::new(executable, dialect, style)
    }
}

impl InvocationConfig {
    /// Apply invocation settings to a driver.
    pub fn apply(&self, mut driver: CommandLineCompiler) -> CommandLineCompiler {
        if let Some(threshold) = self.spill_threshold {
            driver = driver.threshold(threshold);
        }
        if let Some(policy) = self.spill {
            driver = driver.spill_policy(policy);
        }
        if let Some(ref dir) = self.option_file_dir {
            driver = driver.option_file_dir(dir);
        }
        driver
            .keep_option_files(self.keep_option_files)
            .timeout(self.timeout_secs.map(Duration::from_secs))
    }
}

/// Guess the dialect from a compiler file name (`cl.exe`, `clang++`, `x86_64-linux-gnu-gcc`).
pub fn infer_dialect(executable: &Path) -> Option<Dialect> {
    let stem = executable.file_stem()?.to_str()?.to_lowercase();
    if stem == "cl" || stem == "clang-cl" {
        Some(Dialect::Msvc)
    } else if stem.contains("clang") {
        Some(Dialect::Clang)
    } else if stem.ends_with("gcc") || stem.ends_with("g++") || stem == "cc" || stem == "c++" {
        Some(Dialect::Gcc)
    } else {
        None
    }
}

/// The compiler to run when none is configured, searched on PATH.
pub fn default_executable(dialect: Dialect) -> PathBuf {
    let name = match dialect {
        Dialect::Msvc => "cl.exe",
        Dialect::Gcc => "gcc",
        Dialect::Clang => "clang",
    };
    find_executable(name).unwrap_or_else(|| PathBuf::from(name))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.ccinvoke/config.toml)
/// 2. Global config (~/.ccinvoke/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global ccinvoke config directory (~/.ccinvoke).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ccinvoke"))
}

/// Get the global config path (~/.ccinvoke/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.ccinvoke/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".ccinvoke").join("config.toml")
}
