//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ccinvoke::builder::dialect::Dialect;
use ccinvoke::builder::option_file::SpillPolicy;
use ccinvoke::core::CompileSpecBuilder;
use ccinvoke::util::config::{infer_dialect, Config};
use ccinvoke::{ArgStyle, CompileSpec, Language, SpecError};

/// ccinvoke - run C/C++ compilers without command-line length limits
#[derive(Parser)]
#[command(name = "ccinvoke")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile source files
    Compile(CompileArgs),

    /// Print the translated compiler arguments, one per line
    Args(ArgsArgs),

    /// Print the option file that would be handed to the compiler
    Render(RenderArgs),

    /// Write a compile_commands.json compilation database
    Compdb(CompdbArgs),
}

/// What to compile.
#[derive(Args, Debug, Clone)]
pub struct SpecArgs {
    /// Source files
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// Add an include directory
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Define a macro (NAME or NAME=VALUE)
    #[arg(short = 'D', long = "define", value_name = "MACRO")]
    pub defines: Vec<String>,

    /// Pass a raw flag to the compiler (repeatable)
    #[arg(long = "arg", value_name = "FLAG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Output file (single source only)
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Output directory for object files
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Compile only, do not link
    #[arg(short = 'c', long)]
    pub compile_only: bool,

    /// Target architecture or triple
    #[arg(long)]
    pub target: Option<String>,

    /// Source language (c, c++)
    #[arg(long)]
    pub language: Option<Language>,

    /// Generate position-independent code
    #[arg(long)]
    pub pic: bool,
}

impl SpecArgs {
    /// One specification covering every source.
    pub fn to_spec(&self) -> Result<CompileSpec, SpecError> {
        self.builder(self.sources.iter().cloned()).build()
    }

    /// One specification per source file.
    pub fn unit_specs(&self) -> Result<Vec<CompileSpec>, SpecError> {
        let combined = self.to_spec()?;
        combined
            .sources()
            .iter()
            .map(|source| self.builder([source.clone()]).build())
            .collect()
    }

    fn builder(&self, sources: impl IntoIterator<Item = PathBuf>) -> CompileSpecBuilder {
        let mut builder =
            CompileSpec::builder(sources).include_dirs(self.include_dirs.iter().cloned());
        for define in &self.defines {
            builder = builder.define_flag(define);
        }
        builder = builder.args(self.args.iter().cloned());
        if let Some(ref target) = self.target {
            builder = builder.target(target.clone());
        }
        if let Some(language) = self.language {
            builder = builder.language(language);
        }
        if let Some(ref output) = self.output {
            builder = builder.output_file(output.clone());
        }
        if let Some(ref dir) = self.out_dir {
            builder = builder.output_dir(dir.clone());
        }
        builder
            .compile_only(self.compile_only)
            .position_independent(self.pic)
    }
}

/// Which compiler to run and how.
#[derive(Args, Debug, Clone, Default)]
pub struct CompilerArgs {
    /// Compiler executable
    #[arg(long, env = "CCINVOKE_COMPILER")]
    pub compiler: Option<PathBuf>,

    /// Flag dialect (msvc, gcc, clang)
    #[arg(long)]
    pub dialect: Option<Dialect>,

    /// Option-file syntax (windows, posix)
    #[arg(long)]
    pub style: Option<ArgStyle>,

    /// Command-line length at which arguments spill into an option file
    #[arg(long)]
    pub threshold: Option<usize>,

    /// When to use an option file (auto, always, never)
    #[arg(long)]
    pub spill: Option<SpillPolicy>,

    /// Directory for option files
    #[arg(long)]
    pub option_file_dir: Option<PathBuf>,

    /// Keep option files of failed compilations
    #[arg(long)]
    pub keep_option_files: bool,

    /// Kill the compiler after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl CompilerArgs {
    /// Overlay these flags on a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        let mut overrides = Config::default();
        overrides.compiler.executable = self.compiler.clone();
        // A compiler named on the command line brings its own dialect
        overrides.compiler.dialect = self
            .dialect
            .or_else(|| self.compiler.as_deref().and_then(infer_dialect));
        overrides.compiler.style = self.style;
        overrides.invocation.spill_threshold = self.threshold;
        overrides.invocation.spill = self.spill;
        overrides.invocation.option_file_dir = self.option_file_dir.clone();
        overrides.invocation.keep_option_files = self.keep_option_files;
        overrides.invocation.timeout_secs = self.timeout;

        // A configured style belongs to the configured dialect
        let dialect_changed = overrides
            .compiler
            .dialect
            .is_some_and(|d| config.compiler.dialect != Some(d));
        if dialect_changed && self.style.is_none() {
            config.compiler.style = None;
        }
        config.merge(overrides);
    }
}

#[derive(Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    #[command(flatten)]
    pub compiler: CompilerArgs,

    /// Compile each source as its own unit, in parallel
    #[arg(long)]
    pub separate: bool,

    /// Number of parallel jobs (implies --separate)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct ArgsArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    #[command(flatten)]
    pub compiler: CompilerArgs,

    /// Print a single quoted line instead of one token per line
    #[arg(long)]
    pub quoted: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    #[command(flatten)]
    pub compiler: CompilerArgs,

    /// Write the option file here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub write: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompdbArgs {
    #[command(flatten)]
    pub spec: SpecArgs,

    #[command(flatten)]
    pub compiler: CompilerArgs,

    /// Database path
    #[arg(long, value_name = "PATH", default_value = "compile_commands.json")]
    pub db: PathBuf,

    /// Working directory recorded in each entry (defaults to current directory)
    #[arg(long)]
    pub directory: Option<PathBuf>,
}
