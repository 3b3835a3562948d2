//! Core data structures for ccinvoke.
//!
//! This module contains the family-agnostic description of a compilation
//! unit, which every dialect translator consumes.

pub mod spec;

pub use spec::{CompileSpec, CompileSpecBuilder, Language, Output, SpecError};
