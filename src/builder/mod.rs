//! Compiler invocation pipeline.
//!
//! Translation ([`dialect`]), rendering ([`args`]), spilling
//! ([`option_file`]) and execution ([`driver`]) of compiler command lines.

pub mod args;
pub mod batch;
pub mod compile_commands;
pub mod dialect;
pub mod driver;
pub mod errors;
pub mod option_file;

pub use args::ArgStyle;
pub use batch::{compile_all, BatchReport};
pub use compile_commands::{compile_commands, write_compile_commands, CompileCommand};
pub use dialect::Dialect;
pub use driver::{CommandLineCompiler, InvocationResult, Stage, Transport};
pub use errors::CompileError;
pub use option_file::{ArgumentStrategy, OptionFile, OptionFileError, PreparedArgs, SpillPolicy};
