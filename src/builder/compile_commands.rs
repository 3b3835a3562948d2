//! JSON compilation database (`compile_commands.json`) output.
//!
//! Entries always carry the full, unspilled argument list so that tools
//! reading the database see exactly what the compiler sees.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::driver::CommandLineCompiler;
use crate::builder::errors::CompileError;
use crate::core::spec::{CompileSpec, Output};
use crate::util::fs::write_string;

/// compile_commands.json entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Database entries for `spec`, one per source file.
pub fn compile_commands(
    compiler: &CommandLineCompiler,
    spec: &CompileSpec,
    directory: &Path,
) -> Result<Vec<CompileCommand>, CompileError> {
    let tokens = compiler.arguments(spec)?;

    let mut arguments = Vec::with_capacity(tokens.len() + 1);
    arguments.push(compiler.executable().display().to_string());
    arguments.extend(tokens);

    Ok(spec
        .sources()
        .iter()
        .map(|source| CompileCommand {
            directory: directory.display().to_string(),
            file: source.display().to_string(),
            arguments: arguments.clone(),
            output: spec.output().map(|output| match output {
                Output::File(path) => path.display().to_string(),
                Output::Directory(dir) => compiler
                    .dialect()
                    .object_path(dir, source)
                    .display()
                    .to_string(),
            }),
        })
        .collect())
}

impl CommandLineCompiler {
    /// Database entries for `spec`, one per source file.
    pub fn compile_commands(
        &self,
        spec: &CompileSpec,
        directory: &Path,
    ) -> Result<Vec<CompileCommand>, CompileError> {
        compile_commands(self, spec, directory)
    }
}

/// Write entries to `path` as pretty-printed JSON.
pub fn write_compile_commands(path: &Path, commands: &[CompileCommand]) -> Result<()> {
    let json = serde_json::to_string_pretty(commands)
        .context("failed to serialize compile commands")?;
    write_string(path, &json)
}
