//! `ccinvoke compile` command

use std::io::Write;

use anyhow::{Context, Result};

use ccinvoke::builder::batch::compile_all;
use ccinvoke::{CompileError, InvocationResult};

use crate::cli::CompileArgs;

pub fn execute(args: CompileArgs) -> Result<()> {
    let driver = super::driver(&args.compiler)?;

    if args.separate || args.jobs.is_some() {
        let specs = args.spec.unit_specs().map_err(CompileError::from)?;
        let report = compile_all(&driver, &specs, args.jobs)?;

        for result in &report.results {
            forward_output(result)?;
        }

        // Exit with the first failing unit's status
        if let Some(first) = report.results.into_iter().find(|r| !r.success()) {
            first.check()?;
        }

        eprintln!("    Finished {} units", specs.len());
        return Ok(());
    }

    let spec = args.spec.to_spec().map_err(CompileError::from)?;
    let result = driver.compile(&spec)?;
    forward_output(&result)?;
    result.check()?;

    Ok(())
}

/// Copy the compiler's output to our own streams, byte for byte.
fn forward_output(result: &InvocationResult) -> Result<()> {
    std::io::stdout()
        .write_all(result.stdout())
        .context("failed to forward compiler output")?;
    std::io::stderr()
        .write_all(result.stderr())
        .context("failed to forward compiler output")?;
    Ok(())
}
