//! ccinvoke - overflow-safe invocation of command-line C/C++ compilers
//!
//! This crate turns a family-agnostic [`CompileSpec`] into a compiler
//! command line (MSVC, GCC or Clang flavored), spills long command lines
//! into `@file` option files, runs the compiler and reports the outcome.

pub mod builder;
pub mod core;
pub mod util;

/// Test utilities and mocks for ccinvoke unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording process launcher and stub
/// compiler fixtures.
#[cfg(test)]
pub mod test_support;

pub use builder::{
    ArgStyle, CommandLineCompiler, CompileError, Dialect, InvocationResult, SpillPolicy, Transport,
};
pub use crate::core::{CompileSpec, Language, Output, SpecError};
pub use util::Config;
